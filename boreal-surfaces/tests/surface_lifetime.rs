//! End-to-end surface lifetime tests driving the manager the way a
//! compositor host would.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use boreal_core::{ConfigLoader, LifetimePolicyKind, SurfacesConfig};
use boreal_surfaces::{
    FrameSinkId, LocalSurfaceId, Surface, SurfaceId, SurfaceManager, SurfaceReference,
};

fn references_manager() -> SurfaceManager {
    SurfaceManager::new(&SurfacesConfig::default())
}

fn make_surface(manager: &mut SurfaceManager, surface_id: SurfaceId) -> Rc<RefCell<Surface>> {
    let surface = Rc::new(RefCell::new(Surface::new(surface_id)));
    manager.register_surface(surface.clone());
    surface
}

fn surface_info(surface_id: SurfaceId) -> boreal_surfaces::SurfaceInfo {
    boreal_surfaces::SurfaceInfo::new(surface_id, 1.0, boreal_core::Size::new(256, 256))
}

#[test]
fn orphan_surface_survives_until_embedded_then_released() {
    let mut manager = references_manager();
    let root = manager.get_root_surface_id();

    // Client A submits content before any parent references it.
    let sink_a = FrameSinkId::new(1, 1);
    let surface_a = SurfaceId::new(sink_a, LocalSurfaceId::new(1));
    let handle_a = make_surface(&mut manager, surface_a);
    manager.surface_created(&surface_info(surface_a));

    manager.garbage_collect_surfaces();
    assert!(
        manager.get_surface(&surface_a).is_some(),
        "temporary reference must carry the orphan across a collection"
    );

    // Client B is the root's effective parent and embeds A.
    let sink_b = FrameSinkId::new(2, 1);
    let surface_b = SurfaceId::new(sink_b, LocalSurfaceId::new(1));
    make_surface(&mut manager, surface_b);
    manager.add_surface_reference(root, surface_b);
    manager.add_surface_reference(surface_b, surface_a);

    manager.garbage_collect_surfaces();
    assert!(manager.get_surface(&surface_a).is_some());

    // B stops embedding A and A's client destroys it.
    manager.remove_surface_reference(surface_b, surface_a);
    manager.destroy(handle_a);
    assert!(
        manager.get_surface(&surface_a).is_none(),
        "no path from the root and no temporary reference remains"
    );
    assert!(manager.get_surface(&surface_b).is_some());
}

#[test]
fn surface_reachable_through_second_path_survives_edge_removal() {
    let mut manager = references_manager();
    let root = manager.get_root_surface_id();

    let left = SurfaceId::new(FrameSinkId::new(1, 1), LocalSurfaceId::new(1));
    let right = SurfaceId::new(FrameSinkId::new(2, 1), LocalSurfaceId::new(1));
    let shared = SurfaceId::new(FrameSinkId::new(3, 1), LocalSurfaceId::new(1));
    let handle = make_surface(&mut manager, shared);

    manager.add_surface_references(&[
        SurfaceReference::new(root, left),
        SurfaceReference::new(root, right),
        SurfaceReference::new(left, shared),
        SurfaceReference::new(right, shared),
    ]);
    manager.destroy(handle);
    assert!(manager.get_surface(&shared).is_some());

    manager.remove_surface_reference(root, left);
    assert!(
        manager.get_surface(&shared).is_some(),
        "the path through the other parent still reaches the surface"
    );

    manager.remove_surface_reference(right, shared);
    assert!(manager.get_surface(&shared).is_none());
}

#[test]
fn bridged_surface_is_reaped_once_its_only_path_is_removed() {
    let mut manager = references_manager();
    let root = manager.get_root_surface_id();

    let surface_id = SurfaceId::new(FrameSinkId::new(1, 1), LocalSurfaceId::new(1));
    let handle = make_surface(&mut manager, surface_id);
    manager.surface_created(&surface_info(surface_id));
    manager.destroy(handle);
    assert!(manager.get_surface(&surface_id).is_some());

    // The real reference arrives, promoting the temporary one, and is
    // then withdrawn again.
    manager.add_surface_reference(root, surface_id);
    assert!(manager.get_surface(&surface_id).is_some());
    manager.remove_surface_reference(root, surface_id);
    assert!(manager.get_surface(&surface_id).is_none());
}

#[test]
fn removing_a_reference_twice_is_harmless() {
    let mut manager = references_manager();
    let root = manager.get_root_surface_id();

    let surface_id = SurfaceId::new(FrameSinkId::new(1, 1), LocalSurfaceId::new(1));
    let handle = make_surface(&mut manager, surface_id);
    manager.add_surface_reference(root, surface_id);

    manager.remove_surface_reference(root, surface_id);
    manager.remove_surface_reference(root, surface_id);

    manager.destroy(handle);
    assert!(manager.get_surface(&surface_id).is_none());
}

#[test]
fn temporary_reference_limit_evicts_oldest_orphan() {
    let config = SurfacesConfig {
        temporary_reference_limit: 1,
        ..SurfacesConfig::default()
    };
    let mut manager = SurfaceManager::new(&config);

    let sink = FrameSinkId::new(1, 1);
    let first = SurfaceId::new(sink, LocalSurfaceId::new(1));
    let second = SurfaceId::new(sink, LocalSurfaceId::new(2));
    let first_handle = make_surface(&mut manager, first);
    let second_handle = make_surface(&mut manager, second);
    manager.surface_created(&surface_info(first));
    manager.surface_created(&surface_info(second));

    manager.destroy(first_handle);
    manager.destroy(second_handle);
    assert!(
        manager.get_surface(&first).is_none(),
        "the older orphan lost its temporary reference to the newer one"
    );
    assert!(manager.get_surface(&second).is_some());
}

#[test]
fn manager_honors_policy_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[surfaces]\nlifetime_policy = \"sequences\"\ntemporary_reference_limit = 8"
    )
    .unwrap();

    let config = ConfigLoader::load_from_path(file.path()).unwrap();
    assert_eq!(
        config.surfaces.lifetime_policy,
        LifetimePolicyKind::Sequences
    );

    let manager = SurfaceManager::new(&config.surfaces);
    assert!(!manager.using_surface_references());
}
