//! SB3 project JSON: wire schema and conversion into the
//! [`scratch_model::Project`] runtime model.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod loader;
pub mod types;

pub use loader::{build_project, load_project};
pub use types::{
    Sb3Block, Sb3Field, Sb3Input, Sb3Mutation, Sb3NamedList, Sb3NamedValue, Sb3Project, Sb3Target,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> &'static str {
        r#"{
            "targets": [
                {
                    "isStage": true,
                    "name": "Stage",
                    "variables": {},
                    "lists": {},
                    "broadcasts": { "bc1": "go" },
                    "blocks": {},
                    "costumes": [{}],
                    "sounds": [],
                    "currentCostume": 0,
                    "volume": 100
                },
                {
                    "isStage": false,
                    "name": "Sprite1",
                    "variables": { "v1": ["score", 0] },
                    "lists": {},
                    "broadcasts": {},
                    "blocks": {
                        "hat1": {
                            "opcode": "event_whenflagclicked",
                            "next": "set1",
                            "parent": null,
                            "inputs": {},
                            "fields": {},
                            "topLevel": true,
                            "shadow": false
                        },
                        "set1": {
                            "opcode": "data_setvariableto",
                            "next": null,
                            "parent": "hat1",
                            "inputs": {
                                "VALUE": [1, [10, "5"]]
                            },
                            "fields": {
                                "VARIABLE": ["score", "v1"]
                            },
                            "topLevel": false,
                            "shadow": false
                        }
                    },
                    "costumes": [{}],
                    "sounds": [],
                    "currentCostume": 0,
                    "volume": 100
                }
            ]
        }"#
    }

    #[test]
    fn loads_sample_project() {
        let project = load_project(sample_project()).expect("sample project should load");
        assert_eq!(project.targets.len(), 2);
        assert_eq!(project.stage_index, 0);
        assert_eq!(project.broadcasts.len(), 1);

        let sprite = project.sprite_by_name("Sprite1").unwrap();
        assert_eq!(sprite.scripts.len(), 1);
        assert!(matches!(
            sprite.scripts[0].hat,
            scratch_model::HatKind::GreenFlag
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = load_project("not json").unwrap_err();
        assert!(matches!(err, scratch_core::LoadError::InvalidJson(_)));
    }

    #[test]
    fn rejects_missing_stage() {
        let json = r#"{ "targets": [ {
            "isStage": false, "name": "OnlySprite", "variables": {}, "lists": {},
            "broadcasts": {}, "blocks": {}, "costumes": [], "sounds": [],
            "currentCostume": 0, "volume": 100
        } ] }"#;
        let err = load_project(json).unwrap_err();
        assert!(matches!(err, scratch_core::LoadError::StageCount { count: 0 }));
    }
}
