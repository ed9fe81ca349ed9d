// Host-side tests for asset loading and the load barrier.

use otter_core::assets::{load_all, AssetKind, AssetRequest, AssetSource, LoadBarrier, LoadFuture, SceneAsset};
use otter_core::error::AssetError;

/// Serves models, 404s everything else.
struct ModelsOnly;

impl AssetSource for ModelsOnly {
    type Handle = String;

    fn load(&self, request: &AssetRequest) -> LoadFuture<'_, String> {
        let request = *request;
        Box::pin(async move {
            if request.kind == AssetKind::Model {
                Ok(SceneAsset {
                    request,
                    root: format!("node:{}", request.path),
                    animations: vec!["Swim".to_string()],
                })
            } else {
                Err(AssetError::Fetch {
                    path: request.path.to_string(),
                    reason: "404".to_string(),
                })
            }
        })
    }
}

#[test]
fn kind_from_extension() {
    assert_eq!(AssetKind::from_path("/assets/models/otter.glb"), Some(AssetKind::Model));
    assert_eq!(AssetKind::from_path("scene.GLTF"), Some(AssetKind::Model));
    assert_eq!(AssetKind::from_path("bg.PNG"), Some(AssetKind::Texture));
    assert_eq!(AssetKind::from_path("bg.mp4"), Some(AssetKind::Video));
    assert_eq!(AssetKind::from_path("notes.txt"), None);
}

#[test]
fn load_all_reports_failures_in_place() {
    let requests = [
        AssetRequest::model("/assets/models/otter.glb"),
        AssetRequest::texture("/assets/images/node4_bg.png"),
        AssetRequest::model("/assets/models/holt.glb"),
    ];
    let results = pollster::block_on(load_all(&ModelsOnly, &requests));

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().root, "node:/assets/models/otter.glb");
    assert!(matches!(&results[1], Err(AssetError::Fetch { path, .. }) if path == "/assets/images/node4_bg.png"));
    assert_eq!(results[2].as_ref().unwrap().animations, vec!["Swim".to_string()]);
}

#[test]
fn barrier_opens_when_required_loads_settle() {
    let mut barrier = LoadBarrier::new();
    barrier.expect(1u32, true);
    barrier.expect(2, true);
    barrier.expect(3, false);
    assert!(!barrier.is_open());
    assert_eq!(barrier.pending_required(), 2);

    assert!(barrier.settle(1, true));
    assert!(!barrier.is_open());
    // A failed load still settles
    assert!(barrier.settle(2, false));
    assert!(barrier.is_open());
    assert_eq!(barrier.failed_required(), 1);
}

#[test]
fn barrier_ignores_unknown_and_repeated_outcomes() {
    let mut barrier = LoadBarrier::new();
    barrier.expect(1u32, true);

    assert!(!barrier.settle(7, true));
    assert!(barrier.settle(1, true));
    assert!(!barrier.settle(1, false));
    assert_eq!(barrier.failed_required(), 0);
}

#[test]
fn barrier_with_nothing_required_is_open() {
    let mut barrier: LoadBarrier<u32> = LoadBarrier::new();
    assert!(barrier.is_open());
    barrier.expect(4, false);
    assert!(barrier.is_open());

    barrier.forget(4);
    assert!(!barrier.is_tracking(4));
    barrier.expect(5, true);
    barrier.clear();
    assert!(barrier.is_open());
}
