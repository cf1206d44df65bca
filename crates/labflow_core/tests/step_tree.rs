use labflow_core::db::open_db_in_memory;
use labflow_core::{
    EntityId, EntityKind, ProtocolFields, ProtocolRepository, RepoError,
    SqliteProtocolRepository, SqliteStepRepository, SqliteWorkflowRepository, StepFields,
    StepRepository, WorkflowFields, WorkflowRepository,
};
use rusqlite::Connection;

/// The reference PCR procedure: 18 steps inserted with step_order 1..18.
/// Parent values equal to the row's own id reproduce the self-referencing
/// rows present in the original registry fixtures.
const PCR_STEPS: &[(EntityId, &str)] = &[
    (1, "In PCR tubes of 200 μl"),
    (1, "Add 38 μl sterile water"),
    (1, "Add 2 μl of forward primer (10 μM)"),
    (1, "Add 2 μl of reverse primer (10 μM)"),
    (1, "Add 1 μl of dNTPs (50 μM)"),
    (1, "Add 5 μl of reaction buffer containing MgCl2 (10X)"),
    (1, "Add 1 μl of DNA template (100 ng/μl)"),
    (1, "Add 1 μl of DNA polymerase (0.5 U/μl)"),
    (9, "Pipette gently the reaction mixture to allow good homogenization"),
    (10, "Spin 10 seconds at 1000 RPM"),
    (11, "Transfer to thermocycler and run the following program"),
    (11, "An initial step of DNA denaturation at 98°C for 5 min"),
    (11, "Cycle through 30 rounds of"),
    (13, "Denaturation: 98°C for 30 seconds"),
    (13, "Annealing: 60°C for 30 seconds"),
    (13, "Extension: 68°C for 2 min"),
    (11, "Final extension: 72°C for 10 min"),
    (18, "Store at 4°C"),
];

fn setup_pcr_protocol(conn: &Connection) -> EntityId {
    let workflows = SqliteWorkflowRepository::new(conn);
    let protocols = SqliteProtocolRepository::new(conn);
    let steps = SqliteStepRepository::new(conn);

    let workflow_id = workflows
        .create_workflow(&WorkflowFields {
            name: "PCR Workflow".to_string(),
        })
        .unwrap();
    let protocol_id = protocols
        .create_protocol(&ProtocolFields {
            workflow_id: Some(workflow_id),
            name: "PCR version 1".to_string(),
            description: Some(
                "Amplify template using annealing temp of 60°C over 30 cycles".to_string(),
            ),
        })
        .unwrap();

    for (index, (parent, description)) in PCR_STEPS.iter().enumerate() {
        steps
            .create_step(&StepFields {
                protocol_id,
                parent_step_id: Some(*parent),
                description: (*description).to_string(),
                step_order: index as i64 + 1,
            })
            .unwrap();
    }

    protocol_id
}

#[test]
fn pcr_steps_come_back_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let protocol_id = setup_pcr_protocol(&conn);
    let steps = SqliteStepRepository::new(&conn);

    let listed = steps.list_steps_by_protocol(protocol_id).unwrap();
    assert_eq!(listed.len(), 18);

    for (index, step) in listed.iter().enumerate() {
        let (parent, description) = PCR_STEPS[index];
        assert_eq!(step.id, index as i64 + 1);
        assert_eq!(step.step_order, index as i64 + 1);
        assert_eq!(step.parent_step_id, Some(parent));
        assert_eq!(step.description, description);
    }
}

#[test]
fn self_referencing_parent_is_admitted_at_create() {
    let conn = open_db_in_memory().unwrap();
    let protocol_id = setup_pcr_protocol(&conn);
    let steps = SqliteStepRepository::new(&conn);

    // Rows 9, 10 and 18 of the fixture point at themselves.
    for id in [9, 10, 18] {
        let step = steps.get_step(id).unwrap().unwrap();
        assert_eq!(step.protocol_id, protocol_id);
        assert_eq!(step.parent_step_id, Some(id));
    }
}

#[test]
fn list_for_unknown_protocol_is_empty() {
    let conn = open_db_in_memory().unwrap();
    setup_pcr_protocol(&conn);
    let steps = SqliteStepRepository::new(&conn);

    assert!(steps.list_steps_by_protocol(99).unwrap().is_empty());
}

#[test]
fn duplicate_step_order_values_are_permitted() {
    let conn = open_db_in_memory().unwrap();
    let protocol_id = setup_pcr_protocol(&conn);
    let steps = SqliteStepRepository::new(&conn);

    steps
        .create_step(&StepFields {
            protocol_id,
            parent_step_id: None,
            description: "Repeat of position one".to_string(),
            step_order: 1,
        })
        .unwrap();

    let listed = steps.list_steps_by_protocol(protocol_id).unwrap();
    let at_order_one = listed
        .iter()
        .filter(|step| step.step_order == 1)
        .count();
    assert_eq!(at_order_one, 2);
}

#[test]
fn update_is_full_replacement_and_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let protocol_id = setup_pcr_protocol(&conn);
    let steps = SqliteStepRepository::new(&conn);

    let replacement = StepFields {
        protocol_id,
        parent_step_id: None,
        description: "Add 40 μl sterile water".to_string(),
        step_order: 2,
    };
    steps.update_step(2, &replacement).unwrap();
    let first = steps.get_step(2).unwrap().unwrap();

    steps.update_step(2, &replacement).unwrap();
    let second = steps.get_step(2).unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(second.parent_step_id, None);
    assert_eq!(second.description, "Add 40 μl sterile water");
}

#[test]
fn update_missing_step_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let protocol_id = setup_pcr_protocol(&conn);
    let steps = SqliteStepRepository::new(&conn);

    let err = steps
        .update_step(
            99,
            &StepFields {
                protocol_id,
                parent_step_id: None,
                description: "ghost".to_string(),
                step_order: 99,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::Step,
            id: 99
        }
    ));
}

#[test]
fn update_rejects_parent_assignment_that_forms_a_cycle() {
    let conn = open_db_in_memory().unwrap();
    let protocol_id = setup_pcr_protocol(&conn);
    let steps = SqliteStepRepository::new(&conn);

    // Step 14's ancestor chain is 13 -> 11 -> 11 (self loop); pointing 13 at
    // its own descendant 14 would close a cycle.
    let err = steps
        .update_step(
            13,
            &StepFields {
                protocol_id,
                parent_step_id: Some(14),
                description: "Cycle through 30 rounds of".to_string(),
                step_order: 13,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ParentCycle {
            step_id: 13,
            parent_id: 14
        }
    ));
}

#[test]
fn update_rejects_step_as_its_own_parent() {
    let conn = open_db_in_memory().unwrap();
    let protocol_id = setup_pcr_protocol(&conn);
    let steps = SqliteStepRepository::new(&conn);

    let err = steps
        .update_step(
            2,
            &StepFields {
                protocol_id,
                parent_step_id: Some(2),
                description: "Add 38 μl sterile water".to_string(),
                step_order: 2,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ParentCycle {
            step_id: 2,
            parent_id: 2
        }
    ));
}

#[test]
fn cycle_walk_terminates_over_legacy_self_loops() {
    let conn = open_db_in_memory().unwrap();
    let protocol_id = setup_pcr_protocol(&conn);
    let steps = SqliteStepRepository::new(&conn);

    // Step 11 points at itself in the fixture; hanging a step beneath it
    // must terminate the ancestor walk and succeed.
    steps
        .update_step(
            17,
            &StepFields {
                protocol_id,
                parent_step_id: Some(11),
                description: "Final extension: 72°C for 10 min".to_string(),
                step_order: 17,
            },
        )
        .unwrap();

    let loaded = steps.get_step(17).unwrap().unwrap();
    assert_eq!(loaded.parent_step_id, Some(11));
}
