//! End-to-end colorize passes through the engine: real directories on
//! disk, a theme file in the user layer, and a map sink

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use folder_tint::{
    ContentRoot, FolderColorizer, LinearColor, StalePolicy, ThemeId, ThemeLayers, ThemeStore,
    UserSettings,
};

const RED: LinearColor = LinearColor::rgb(1.0, 0.0, 0.0);
const BLUE: LinearColor = LinearColor::rgb(0.0, 0.0, 1.0);

type Engine = FolderColorizer<Vec<ContentRoot>, BTreeMap<String, LinearColor>>;

fn make_tree(root: &Path, dirs: &[&str]) {
    for dir in dirs {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
}

fn write_user_theme(tmp: &tempfile::TempDir, id: &str, name: &str, schemes: &str) -> PathBuf {
    let dir = tmp.path().join("user");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{name}.json"));
    fs::write(
        &path,
        format!(r#"{{"Version":1,"Id":"{id}","DisplayName":"{name}","Schemes":{{{schemes}}}}}"#),
    )
    .unwrap();
    path
}

fn engine_with_roots(tmp: &tempfile::TempDir, roots: Vec<ContentRoot>) -> Engine {
    let store = ThemeStore::new(ThemeLayers::user_only(tmp.path().join("user")))
        .with_settings_file(tmp.path().join("settings.yaml"));
    FolderColorizer::new(store, UserSettings::default(), roots, BTreeMap::new())
}

#[test]
fn applying_a_theme_colors_matching_folders() {
    let tmp = tempfile::tempdir().unwrap();
    let content = tmp.path().join("content");
    make_tree(&content, &["Art/Characters", "Maps", "Design"]);

    let id_str = "00000000000000000000000000000010";
    write_user_theme(
        &tmp,
        id_str,
        "Red Art",
        r#""0":{"SchemeColor":"(R=1.000000,G=0.000000,B=0.000000,A=1.000000)","FolderNames":["Art"],"ExplicitPaths":[]}"#,
    );

    let mut engine = engine_with_roots(&tmp, vec![ContentRoot::new(&content, "Game")]);
    engine.startup();
    engine.apply_theme(ThemeId::parse(id_str).unwrap()).unwrap();

    assert_eq!(engine.sink().get("Game/Art"), Some(&RED));
    // Only the folder named "Art" matches; its children do not inherit
    assert!(engine.sink().get("Game/Art/Characters").is_none());
    assert_eq!(
        engine.last_outcome().unmatched,
        vec!["Game/Art/Characters", "Game/Design", "Game/Maps"]
    );
}

#[test]
fn explicit_path_beats_nothing_but_slot_order_beats_everything() {
    let tmp = tempfile::tempdir().unwrap();
    let content = tmp.path().join("content");
    make_tree(&content, &["Art", "Maps/Arena"]);

    // Slot 0 claims the leaf name "Arena"; slot 1 claims the explicit
    // path Game/Maps/Arena. Slot order decides, so red wins.
    let id_str = "00000000000000000000000000000011";
    write_user_theme(
        &tmp,
        id_str,
        "Ordered",
        r#""0":{"SchemeColor":"(R=1.000000,G=0.000000,B=0.000000,A=1.000000)","FolderNames":["Arena"],"ExplicitPaths":[]},
           "1":{"SchemeColor":"(R=0.000000,G=0.000000,B=1.000000,A=1.000000)","FolderNames":[],"ExplicitPaths":["Game/Maps/Arena"]}"#,
    );

    let mut engine = engine_with_roots(&tmp, vec![ContentRoot::new(&content, "Game")]);
    engine.startup();
    engine.apply_theme(ThemeId::parse(id_str).unwrap()).unwrap();

    assert_eq!(engine.sink().get("Game/Maps/Arena"), Some(&RED));
}

#[test]
fn switching_themes_recolors() {
    let tmp = tempfile::tempdir().unwrap();
    let content = tmp.path().join("content");
    make_tree(&content, &["Art"]);

    let red_id = "00000000000000000000000000000012";
    let blue_id = "00000000000000000000000000000013";
    write_user_theme(
        &tmp,
        red_id,
        "Red",
        r#""0":{"SchemeColor":"(R=1.000000,G=0.000000,B=0.000000,A=1.000000)","FolderNames":["Art"],"ExplicitPaths":[]}"#,
    );
    write_user_theme(
        &tmp,
        blue_id,
        "Blue",
        r#""0":{"SchemeColor":"(R=0.000000,G=0.000000,B=1.000000,A=1.000000)","FolderNames":["Art"],"ExplicitPaths":[]}"#,
    );

    let mut engine = engine_with_roots(&tmp, vec![ContentRoot::new(&content, "Game")]);
    engine.startup();

    engine.apply_theme(ThemeId::parse(red_id).unwrap()).unwrap();
    assert_eq!(engine.sink().get("Game/Art"), Some(&RED));

    engine.apply_theme(ThemeId::parse(blue_id).unwrap()).unwrap();
    assert_eq!(engine.sink().get("Game/Art"), Some(&BLUE));
}

#[test]
fn new_folder_is_colored_after_change_notification() {
    let tmp = tempfile::tempdir().unwrap();
    let content = tmp.path().join("content");
    make_tree(&content, &["Art"]);

    let id_str = "00000000000000000000000000000014";
    write_user_theme(
        &tmp,
        id_str,
        "Red Art",
        r#""0":{"SchemeColor":"(R=1.000000,G=0.000000,B=0.000000,A=1.000000)","FolderNames":["Art"],"ExplicitPaths":[]}"#,
    );

    let mut engine = engine_with_roots(&tmp, vec![ContentRoot::new(&content, "Game")]);
    engine.startup();
    engine.apply_theme(ThemeId::parse(id_str).unwrap()).unwrap();

    fs::create_dir_all(content.join("Maps/Art")).unwrap();
    engine.on_folder_set_changed();

    assert_eq!(engine.sink().get("Game/Maps/Art"), Some(&RED));
}

#[test]
fn stale_colors_clear_when_policy_says_so() {
    let tmp = tempfile::tempdir().unwrap();
    let content = tmp.path().join("content");
    make_tree(&content, &["Art"]);

    let id_str = "00000000000000000000000000000015";
    write_user_theme(
        &tmp,
        id_str,
        "Red Art",
        r#""0":{"SchemeColor":"(R=1.000000,G=0.000000,B=0.000000,A=1.000000)","FolderNames":["Art"],"ExplicitPaths":[]}"#,
    );

    let mut engine = engine_with_roots(&tmp, vec![ContentRoot::new(&content, "Game")]);
    engine.startup();
    engine.set_stale_policy(StalePolicy::Clear).unwrap();
    engine.apply_theme(ThemeId::parse(id_str).unwrap()).unwrap();
    assert_eq!(engine.sink().get("Game/Art"), Some(&RED));

    // Back to the empty built-in theme: everything is stale and clears
    engine.apply_theme(ThemeId::NO_THEME).unwrap();
    assert!(engine.sink().is_empty());
}

#[test]
fn default_leave_policy_keeps_stale_colors() {
    let tmp = tempfile::tempdir().unwrap();
    let content = tmp.path().join("content");
    make_tree(&content, &["Art"]);

    let id_str = "00000000000000000000000000000016";
    write_user_theme(
        &tmp,
        id_str,
        "Red Art",
        r#""0":{"SchemeColor":"(R=1.000000,G=0.000000,B=0.000000,A=1.000000)","FolderNames":["Art"],"ExplicitPaths":[]}"#,
    );

    let mut engine = engine_with_roots(&tmp, vec![ContentRoot::new(&content, "Game")]);
    engine.startup();
    engine.apply_theme(ThemeId::parse(id_str).unwrap()).unwrap();

    engine.apply_theme(ThemeId::NO_THEME).unwrap();
    assert_eq!(engine.sink().get("Game/Art"), Some(&RED));
}

#[test]
fn plugin_roots_are_colored_under_their_virtual_path() {
    let tmp = tempfile::tempdir().unwrap();
    let game = tmp.path().join("game");
    let plugin = tmp.path().join("plugin");
    make_tree(&game, &["Art"]);
    make_tree(&plugin, &["Shaders"]);

    let id_str = "00000000000000000000000000000017";
    write_user_theme(
        &tmp,
        id_str,
        "Plugin Aware",
        r#""0":{"SchemeColor":"(R=0.000000,G=0.000000,B=1.000000,A=1.000000)","FolderNames":[],"ExplicitPaths":["Tools/FX/Shaders"]}"#,
    );

    let roots = vec![
        ContentRoot::new(&game, "Game"),
        ContentRoot::new(&plugin, "FX").with_virtual_path("/Tools/FX/"),
    ];
    let mut engine = engine_with_roots(&tmp, roots);
    engine.startup();
    engine.apply_theme(ThemeId::parse(id_str).unwrap()).unwrap();

    assert_eq!(engine.sink().get("Tools/FX/Shaders"), Some(&BLUE));
    assert!(engine.sink().get("Game/Art").is_none());
}

#[test]
fn repeated_passes_are_stable() {
    let tmp = tempfile::tempdir().unwrap();
    let content = tmp.path().join("content");
    make_tree(&content, &["Art", "Maps"]);

    let id_str = "00000000000000000000000000000018";
    write_user_theme(
        &tmp,
        id_str,
        "Red Art",
        r#""0":{"SchemeColor":"(R=1.000000,G=0.000000,B=0.000000,A=1.000000)","FolderNames":["Art"],"ExplicitPaths":[]}"#,
    );

    let mut engine = engine_with_roots(&tmp, vec![ContentRoot::new(&content, "Game")]);
    engine.startup();
    engine.apply_theme(ThemeId::parse(id_str).unwrap()).unwrap();

    let first_sink = engine.sink().clone();
    let first_outcome = engine.last_outcome().clone();
    engine.request_refresh();
    assert_eq!(engine.sink(), &first_sink);
    assert_eq!(engine.last_outcome(), &first_outcome);
}
