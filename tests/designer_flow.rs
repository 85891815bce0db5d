//! End-to-end designer flow through the public API.

use std::time::Duration;

use alliance_base_designer::designer::catalog::BuildingCatalog;
use alliance_base_designer::designer::gesture::{GestureMachine, PointerButton, PointerInput};
use alliance_base_designer::designer::layout::{BaseLayout, BuildingId, PlacedBuilding};
use alliance_base_designer::designer::session::{ActiveTool, CanvasSize, DesignFocus};
use alliance_base_designer::designer::viewport::Viewport;
use alliance_base_designer::screens::Screen;
use alliance_base_designer::{EditLabelRequested, LayoutSeed};
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use pretty_assertions::assert_eq;

const CANVAS: Vec2 = Vec2::new(1000.0, 800.0);

#[derive(Resource, Default)]
struct EditRequests(Vec<BuildingId>);

fn collect_edit_requests(
    mut requests: MessageReader<EditLabelRequested>,
    mut seen: ResMut<EditRequests>,
) {
    seen.0.extend(requests.read().map(|r| r.building));
}

fn create_designer_app(records: Vec<PlacedBuilding>) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(40)));
    app.insert_resource(LayoutSeed {
        catalog: BuildingCatalog::alliance_defaults(),
        records,
    });
    app.init_resource::<EditRequests>();
    app.add_plugins(alliance_base_designer::plugin);
    app.add_systems(PostUpdate, collect_edit_requests);
    app.insert_resource(CanvasSize(CANVAS));

    // Loading -> Designer, then let OnEnter commands apply.
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(
        *app.world().resource::<State<Screen>>().get(),
        Screen::Designer
    );
    app
}

fn screen_of(app: &App, cell: IVec2) -> Vec2 {
    app.world()
        .resource::<Viewport>()
        .projection(CANVAS)
        .cell_center_to_screen(cell)
}

fn tap(app: &mut App, position: Vec2) {
    app.world_mut().write_message(PointerInput::Down {
        position,
        button: PointerButton::Touch,
    });
    app.update();
    app.world_mut().write_message(PointerInput::Up { position });
    app.update();
}

#[test]
fn build_a_base_by_touch() {
    let mut app = create_designer_app(Vec::new());

    // A city cannot be the first building: there is no territory yet.
    app.world_mut().resource_mut::<ActiveTool>().0 = Some("city".to_string());
    let city_cell = IVec2::new(603, 603);
    let pos = screen_of(&app, city_cell);
    tap(&mut app, pos);
    assert!(app.world().resource::<BaseLayout>().buildings().is_empty());

    // Banner first, then the city inside its zone.
    app.world_mut().resource_mut::<ActiveTool>().0 = Some("banner".to_string());
    let pos = screen_of(&app, IVec2::splat(600));
    tap(&mut app, pos);
    app.world_mut().resource_mut::<ActiveTool>().0 = Some("city".to_string());
    for _ in 0..10 {
        app.update();
    }
    let pos = screen_of(&app, city_cell);
    tap(&mut app, pos);

    let layout = app.world().resource::<BaseLayout>();
    let types: Vec<&str> = layout
        .buildings()
        .iter()
        .map(|b| b.type_id.as_str())
        .collect();
    assert_eq!(types, vec!["banner", "city"]);
    assert_eq!(
        layout.building_at(city_cell + IVec2::ONE).map(PlacedBuilding::origin),
        Some(city_cell)
    );
}

#[test]
fn long_press_drag_then_double_tap_label() {
    let records = vec![
        PlacedBuilding {
            id: BuildingId(1),
            type_id: "banner".to_string(),
            x: 600,
            y: 600,
            label: None,
        },
        PlacedBuilding {
            id: BuildingId(2),
            type_id: "city".to_string(),
            x: 602,
            y: 602,
            label: Some("Ana".to_string()),
        },
    ];
    let mut app = create_designer_app(records);
    let city = BuildingId(2);

    // Hold on the city until the long-press fires, then drag it.
    let start = screen_of(&app, IVec2::splat(602));
    app.world_mut().write_message(PointerInput::Down {
        position: start,
        button: PointerButton::Touch,
    });
    for _ in 0..15 {
        app.update();
    }
    assert!(app.world().resource::<GestureMachine>().drag().is_some());

    let target = screen_of(&app, IVec2::splat(596));
    app.world_mut()
        .write_message(PointerInput::Move { position: target });
    app.update();
    app.world_mut()
        .write_message(PointerInput::Up { position: target });
    app.update();
    assert_eq!(
        app.world()
            .resource::<BaseLayout>()
            .get(city)
            .map(PlacedBuilding::origin),
        Some(IVec2::splat(596))
    );

    // Let the tap window lapse, then double-tap the moved city.
    for _ in 0..20 {
        app.update();
    }
    let moved = screen_of(&app, IVec2::splat(596));
    tap(&mut app, moved);
    tap(&mut app, moved);
    for _ in 0..20 {
        app.update();
    }
    assert_eq!(app.world().resource::<EditRequests>().0, vec![city]);
    assert_eq!(app.world().resource::<DesignFocus>().selected, None);

    // The host writes the label back.
    let mut layout = app.world_mut().resource_mut::<BaseLayout>();
    assert!(layout.set_label(city, Some("Bea".to_string())));
    let json = layout.to_json().unwrap();
    let restored = BaseLayout::from_json(BuildingCatalog::alliance_defaults(), &json).unwrap();
    assert_eq!(
        restored.get(city).and_then(|b| b.label.as_deref()),
        Some("Bea")
    );
}
