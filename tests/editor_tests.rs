use blueprint::markers::{POINT_REGION_MARKER, REGION_ID_KEY};
use blueprint::{
    BlockPosition, BlockState, BlueprintLibrary, EditorSessions, LibraryConfig, NbtMap, NbtValue,
    Region, Vec3, EDITOR_ROOT,
};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("blueprint-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// New blueprint: edit, commit, reload from disk, reopen with the edits in place.
#[test]
fn edit_commit_reload_cycle() {
    init_tracing();
    let root = scratch_dir("editor-cycle");
    let mut library = BlueprintLibrary::new(LibraryConfig::new(&root));
    let mut sessions = EditorSessions::new();

    {
        let (session, created) = sessions.open("arena/lobby", &library);
        assert!(created);
        session.set_block(EDITOR_ROOT + BlockPosition::new(1, 0, 0), BlockState::new("minecraft:stone"));
        session.set_block(EDITOR_ROOT + BlockPosition::new(0, 1, 0), BlockState::new("minecraft:glass"));

        let marker = EDITOR_ROOT + BlockPosition::new(1, 1, 0);
        session.set_block(marker, BlockState::new(POINT_REGION_MARKER));
        let mut data = NbtMap::new();
        data.insert(REGION_ID_KEY.to_string(), NbtValue::String("spawn".to_string()));
        session.set_block_data(marker, data);

        let markers = session.markers();
        let path = session.commit_to(&mut library, &markers).unwrap();
        assert_eq!(path, root.join("arena").join("lobby.nbt"));
        assert!(path.is_file());
    }
    assert_eq!(sessions.close_all(), 1);

    let mut reloaded = BlueprintLibrary::new(LibraryConfig::new(&root));
    assert_eq!(reloaded.load().unwrap(), 1);
    assert_eq!(reloaded.ids(), vec!["arena/lobby".to_string()]);

    let bp = reloaded.get("arena/lobby").unwrap();
    assert_eq!(bp.size, BlockPosition::new(2, 2, 1));
    assert_eq!(bp.total_blocks(), 3);
    assert_eq!(bp.regions.get("spawn"), Some(&Region::point(Vec3::new(1.0, 1.0, 0.0))));

    let (session, created) = sessions.open("arena/lobby", &reloaded);
    assert!(!created);
    assert_eq!(
        session.get_block(EDITOR_ROOT + BlockPosition::new(0, 1, 0)).get_name(),
        "minecraft:glass"
    );

    let _ = std::fs::remove_dir_all(&root);
}

/// Shrinking a blueprint in the editor shrinks the committed size.
#[test]
fn commit_uses_tight_bounds() {
    let root = scratch_dir("editor-tight");
    let mut library = BlueprintLibrary::new(LibraryConfig::new(&root));
    let mut sessions = EditorSessions::new();

    let (session, _) = sessions.open("shrink", &library);
    let far = EDITOR_ROOT + BlockPosition::new(5, 0, 5);
    session.set_block(far, BlockState::new("minecraft:dirt"));
    session.set_block(EDITOR_ROOT, BlockState::air());

    let bp = session.commit(&());
    assert_eq!(bp.size, BlockPosition::new(1, 1, 1));
    assert_eq!(bp.palette, vec![BlockState::new("minecraft:dirt")]);

    library.save("shrink", bp).unwrap();
    assert!(library.contains("shrink"));
    let _ = std::fs::remove_dir_all(&root);
}

/// Broken files are skipped when the library loads.
#[test]
fn library_skips_corrupt_files() {
    init_tracing();
    let root = scratch_dir("library-corrupt");
    let mut library = BlueprintLibrary::new(LibraryConfig::new(&root));
    library.save("good", blueprint::Blueprint::empty()).unwrap();
    std::fs::write(root.join("bad.nbt"), b"garbage").unwrap();
    std::fs::write(root.join("ignored.txt"), b"not a blueprint").unwrap();

    let mut fresh = BlueprintLibrary::new(LibraryConfig::new(&root));
    assert_eq!(fresh.load().unwrap(), 1);
    assert!(fresh.get("good").is_some());
    assert!(fresh.get("bad").is_none());

    let _ = std::fs::remove_dir_all(&root);
}

/// A library over a directory that does not exist is simply empty.
#[test]
fn library_missing_root_is_empty() {
    let mut library = BlueprintLibrary::new(LibraryConfig::new(scratch_dir("library-missing")));
    assert_eq!(library.load().unwrap(), 0);
    assert!(library.is_empty());
}
