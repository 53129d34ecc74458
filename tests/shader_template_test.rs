use matcap_flow::{
    error::SetupError,
    pipelines::{
        matcap::{base_template, blend_patch, blended_source, flat_source},
        template::{ShaderPatch, ShaderTemplate},
    },
};

const SOURCE: &str = "fn main() {\n    //@point(body)\n}\n";

#[test]
fn marker_lines_become_patch_code_with_their_indent() {
    let template = ShaderTemplate::parse("test", SOURCE).unwrap();
    let patch = ShaderPatch::new("body").insert("body", "let a = 1;\nlet b = a;");
    let out = template.render(&[&patch]).unwrap();
    assert_eq!(out, "fn main() {\n    let a = 1;\n    let b = a;\n}\n");
}

#[test]
fn unpatched_points_expand_to_their_default() {
    let template = ShaderTemplate::parse("test", SOURCE)
        .unwrap()
        .with_default("body", "return;")
        .unwrap();
    assert_eq!(template.render(&[]).unwrap(), "fn main() {\n    return;\n}\n");
}

#[test]
fn patch_for_a_missing_point_is_rejected() {
    let template = ShaderTemplate::parse("test", SOURCE).unwrap();
    let patch = ShaderPatch::new("stray").insert("fragment_end", "discard;");
    match template.render(&[&patch]) {
        Err(SetupError::MissingInsertionPoint { template, point }) => {
            assert_eq!(template, "test");
            assert_eq!(point, "fragment_end");
        }
        other => panic!("expected a missing insertion point, got {other:?}"),
    }
}

#[test]
fn default_for_a_missing_point_is_rejected() {
    let result = ShaderTemplate::parse("test", SOURCE)
        .unwrap()
        .with_default("nope", "");
    assert!(matches!(result, Err(SetupError::MissingInsertionPoint { .. })));
}

#[test]
fn duplicate_points_are_rejected() {
    let source = "//@point(a)\n//@point(a)\n";
    assert!(matches!(
        ShaderTemplate::parse("dup", source),
        Err(SetupError::DuplicateInsertionPoint { .. })
    ));
}

#[test]
fn two_patches_on_one_point_conflict() {
    let template = ShaderTemplate::parse("test", SOURCE).unwrap();
    let a = ShaderPatch::new("a").insert("body", "a();");
    let b = ShaderPatch::new("b").insert("body", "b();");
    assert!(matches!(
        template.render(&[&a, &b]),
        Err(SetupError::ConflictingPatch { .. })
    ));
}

#[test]
fn matcap_template_declares_its_points() {
    let template = base_template().unwrap();
    let points: Vec<&str> = template.points().collect();
    assert_eq!(points, vec!["bindings", "matcap_color"]);
}

#[test]
fn flat_shader_samples_the_material_matcap() {
    let source = flat_source().unwrap();
    assert!(source.contains("let matcap_color = textureSample(t_matcap, s_matcap, uv);"));
    assert!(!source.contains("t_matcap_1"));
    assert!(!source.contains("//@point("));
}

#[test]
fn blended_shader_wipes_between_two_matcaps() {
    let source = blended_source().unwrap();
    assert!(source.contains("@group(2) @binding(4)"));
    assert!(source.contains("textureSample(t_matcap_1, s_matcap_1, uv)"));
    assert!(source.contains("textureSample(t_matcap_2, s_matcap_2, uv)"));
    assert!(source.contains("let matcap_color = mix(matcap_color_2, matcap_color_1, wipe);"));
    assert!(!source.contains("textureSample(t_matcap, s_matcap, uv)"));
    assert!(!source.contains("//@point("));
}

#[test]
fn blend_patch_only_touches_known_points() {
    let template = base_template().unwrap();
    assert!(template.render(&[&blend_patch()]).is_ok());
    assert_eq!(blend_patch().label(), "matcap cross-fade");
}
