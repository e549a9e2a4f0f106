//! End-to-end builder flows through the facade.
//!
//! Walks the full lifecycle: build a grid, drag squares into zones, export
//! the schema, save the form, reopen it from the saved builder state, and
//! chart the responses.

use formgrid::client::{InMemoryForms, tally_field};
use formgrid::prelude::*;
use formgrid::{
    ChartDatum, FieldOption, FormResponsesApi, FormsApi, NewForm, ResponseSubmission,
    ResponseValue, RevertReason, SessionId, SquareId, zone_range,
};
use std::collections::BTreeMap;

fn geometry_of(eng: &PlacementEngine) -> ZoneGeometry {
    let mut areas = Vec::new();
    let mut y = 0.0;
    for layout in eng.layouts().layouts() {
        areas.push((
            layout.id,
            BoundRect::new(400.0, y, 120.0 * layout.columns as f32, 60.0),
        ));
        y += 70.0;
    }
    ZoneGeometry::collect(eng.layouts(), &areas)
}

fn drop_on_zone(eng: &mut PlacementEngine, id: SquareId, zone: usize) -> DropOutcome {
    let geometry = geometry_of(eng);
    let rect = BoundRect::from_size(24.0, 24.0)
        .centered_at(geometry.rect_of(zone).unwrap().center());
    eng.drop_at(id, &rect, &geometry, None)
}

#[test]
fn two_squares_contend_for_one_zone() {
    let mut eng = PlacementEngine::new(EngineConfig::default().with_seed(11));
    eng.add_layout(2, 1).unwrap();
    let s1 = eng.create_square();
    let s2 = eng.create_square();

    assert!(drop_on_zone(&mut eng, s1, 0).is_placed());
    assert!(eng.squares().get(s1).unwrap().is_used);

    match drop_on_zone(&mut eng, s2, 0) {
        DropOutcome::Reverted { reason, .. } => assert_eq!(reason, RevertReason::Occupied),
        other => unreachable!("expected Reverted, got {other:?}"),
    }
    assert_eq!(eng.placements().occupant(0), Some(s1));
}

#[test]
fn appending_a_layout_preserves_placements() {
    let mut eng = PlacementEngine::new(EngineConfig::default().with_seed(11));
    eng.add_layout(2, 1).unwrap();
    let s1 = eng.create_square();
    assert!(drop_on_zone(&mut eng, s1, 0).is_placed());

    let b = eng.add_layout(1, 1).unwrap();
    assert_eq!(eng.placements().occupant(0), Some(s1));
    assert_eq!(zone_range(eng.layouts().layouts(), b), Some(2..3));
}

#[test]
fn removing_a_layout_frees_everything() {
    let mut eng = PlacementEngine::new(EngineConfig::default().with_seed(11));
    let a = eng.add_layout(2, 1).unwrap();
    let s1 = eng.create_square();
    let s2 = eng.create_square();
    assert!(drop_on_zone(&mut eng, s1, 0).is_placed());

    eng.remove_layout(a).unwrap();
    assert!(eng.layouts().is_empty());
    assert_eq!(eng.layouts().total_capacity(), 0);
    for id in [s1, s2] {
        assert!(!eng.squares().get(id).unwrap().is_used);
    }
}

#[test]
fn partial_row_blocks_validated_export() {
    let mut eng = PlacementEngine::new(EngineConfig::default().with_seed(11));
    eng.add_layout(2, 1).unwrap();
    let s1 = eng.create_square();
    eng.squares_mut().update_label(s1, "Name").unwrap();
    assert!(drop_on_zone(&mut eng, s1, 0).is_placed());

    let result = FormStructureBuilder::new()
        .validated()
        .build(eng.squares(), eng.layouts(), eng.placements());
    assert!(result.is_err());
}

#[test]
fn save_reopen_and_chart_round_trip() -> formgrid::Result<()> {
    // Build: one 2-column layout, two fields.
    let mut eng = PlacementEngine::new(EngineConfig::default().with_seed(11));
    eng.add_layout(2, 1)?;
    let name = eng.create_square();
    let color = eng.create_square();
    eng.squares_mut().update_label(name, "Name")?;
    eng.squares_mut().update_label(color, "Color")?;
    eng.squares_mut().update_kind(color, FieldKind::Select)?;
    eng.squares_mut()
        .add_option(color, FieldOption::new("red", "Red"))?;
    eng.squares_mut()
        .add_option(color, FieldOption::new("blue", "Blue"))?;
    assert!(drop_on_zone(&mut eng, name, 0).is_placed());
    assert!(drop_on_zone(&mut eng, color, 1).is_placed());

    let schema = FormStructureBuilder::new().validated().build(
        eng.squares(),
        eng.layouts(),
        eng.placements(),
    )?;
    assert_eq!(schema.len(), 1);

    // Save with the builder state attached.
    let service = InMemoryForms::new();
    let record = service.create(&NewForm {
        name: "Palette survey".into(),
        description: "favorite colors".into(),
        form_data: schema,
        drag_structure: eng.snapshot(),
        created_by: "designer".into(),
    })?;

    // Reopen: restoring the saved builder state reproduces the schema.
    let fetched = service.get(record.id)?;
    let mut reopened = PlacementEngine::default();
    reopened.restore(fetched.drag_structure)?;
    let rebuilt = FormStructureBuilder::new().validated().build(
        reopened.squares(),
        reopened.layouts(),
        reopened.placements(),
    )?;
    assert_eq!(rebuilt, fetched.form_data);

    // Submit a few responses and chart the color field.
    for value in ["red", "red", "blue"] {
        let mut responses = BTreeMap::new();
        responses.insert("color".to_string(), ResponseValue::One(value.into()));
        service.submit(&ResponseSubmission {
            form_id: record.id,
            session_id: SessionId::generate(),
            responses,
            user_agent: "test/1.0".into(),
            submitted_at: "2024-05-01T12:00:00Z".into(),
        })?;
    }

    let records = service.list_for_form(record.id)?;
    let data = tally_field("color", &records);
    assert_eq!(
        data[0],
        ChartDatum {
            category: "red".into(),
            value: 2,
            real_percent: Some("66.7".into()),
        }
    );
    Ok(())
}
