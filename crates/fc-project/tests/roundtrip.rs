use fc_engine::{MembershipFunction, TermNaming};
use fc_project::schema::*;
use fc_project::{load, load_json, load_yaml, save, save_json, save_yaml, validate_project};

fn hand_written() -> Project {
    let triangles = |names: [&str; 5]| TermSetDef::Explicit {
        terms: names
            .iter()
            .zip([-1.0, -0.5, 0.0, 0.5, 1.0])
            .map(|(name, peak)| TermDef {
                name: name.to_string(),
                shape: MembershipFunction::Triangle {
                    a: peak - 0.5,
                    b: peak,
                    c: peak + 0.5,
                },
            })
            .collect(),
    };
    let mut project = Project::steering_default();
    project.name = "Hand written".to_string();
    for var in project.inputs.iter_mut().chain(project.outputs.iter_mut()) {
        var.terms = triangles(["FarLeft", "Left", "Zero", "Right", "FarRight"]);
    }
    project
}

#[test]
fn roundtrip_yaml_default_project() {
    let project = Project::steering_default();
    validate_project(&project).unwrap();

    let temp_dir = std::env::temp_dir();
    let path = temp_dir.join("fc_project_roundtrip_default.yaml");

    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_explicit_terms() {
    let project = hand_written();

    let temp_dir = std::env::temp_dir();
    let path = temp_dir.join("fc_project_roundtrip_explicit.json");

    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn extension_picks_format() {
    let project = hand_written();
    let temp_dir = std::env::temp_dir();

    let json = temp_dir.join("fc_project_ext.json");
    save(&json, &project).unwrap();
    let text = std::fs::read_to_string(&json).unwrap();
    assert!(text.trim_start().starts_with('{'));
    assert_eq!(load(&json).unwrap(), project);

    let yaml = temp_dir.join("fc_project_ext.yaml");
    save(&yaml, &project).unwrap();
    assert_eq!(load(&yaml).unwrap(), project);
}

#[test]
fn minimal_yaml_fills_defaults() {
    let yaml = r#"
version: 1
name: Minimal
inputs:
  - name: Displacement
    min: -1.0
    max: 1.0
    terms:
      type: Generated
      count: 3
      naming: numbered
  - name: Velocity
    min: -1.0
    max: 1.0
    terms:
      type: Generated
      count: 3
      naming: numbered
outputs:
  - name: Steering
    min: -1.0
    max: 1.0
    terms:
      type: Generated
      count: 3
      naming: numbered
rules:
  displacement: Displacement
  velocity: Velocity
  steering: Steering
"#;
    let project: Project = serde_yaml::from_str(yaml).unwrap();
    validate_project(&project).unwrap();
    assert_eq!(project.operators, OperatorsDef::default());
    assert_eq!(project.simulation, SimulationDef::default());
    assert_eq!(
        project.inputs[0].terms,
        TermSetDef::Generated {
            count: 3,
            naming: TermNaming::Numbered,
            centre_name: None,
            half_width: None,
        }
    );
}

#[test]
fn invalid_file_is_rejected_on_save_and_load() {
    let mut project = Project::steering_default();
    project.simulation.timestep = -0.1;

    let temp_dir = std::env::temp_dir();
    let path = temp_dir.join("fc_project_invalid.yaml");
    assert!(save_yaml(&path, &project).is_err());

    std::fs::write(&path, serde_yaml::to_string(&project).unwrap()).unwrap();
    assert!(matches!(
        load_yaml(&path),
        Err(fc_project::ProjectError::Validation(_))
    ));
}
