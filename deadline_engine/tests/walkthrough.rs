use deadline_engine::loader::load_world;
use deadline_engine::repl::input::ScriptedInput;
use deadline_engine::{Ending, View, load_session, run_repl};

use std::path::PathBuf;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn walkthrough() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../demos/walkthrough.txt")
}

#[test]
fn campus_world_loads_and_validates() {
    let world = load_world(&data_dir().join("world.json")).unwrap();
    assert_eq!(world.locations.len(), 14);
    assert_eq!(world.scripts.len(), 7);
    // items awarded by scripts start out of play
    assert!(world.item("potion").unwrap().container.is_nowhere());
    assert_eq!(world.items_at(9).count(), 1);
}

#[test]
fn winning_walkthrough_meets_the_deadline() {
    // the drawers game may end early; leftover guesses are then rejected without cost
    for seed in [1, 7, 42] {
        let world = data_dir().join("world.json");
        let config = data_dir().join("session.toml");
        let mut session = load_session(Some(&world), Some(&config), Some(seed)).unwrap();
        let mut io = ScriptedInput::from_file(&walkthrough()).unwrap();
        let mut view = View::new();

        let ending = run_repl(&mut session, &mut view, &mut io).unwrap();

        assert_eq!(ending, Ending::Victory, "seed {seed}");
        assert_eq!(
            session.log.id_log(),
            vec![
                1, 2, 20, 20, 2, 4, 8, 8, 7, 70, 70, 70, 7, 8, 9, 9, 5, 3, 30, 30, 30, 3, 5, 6, 6, 11, 11, 6, 5, 3,
                2, 1, 1
            ]
        );
        assert_eq!(session.player.moves_remaining, 45 - 32);
        assert_eq!(io.remaining(), 0);
        // twelve first visits, the labels puzzle and four submitted items at least
        assert!(session.player.score >= 120 + 20 + 80);
    }
}

#[test]
fn walkthrough_cut_short_quits() {
    let world = data_dir().join("world.json");
    let mut session = load_session(Some(&world), Some(&data_dir().join("session.toml")), Some(5)).unwrap();
    let mut io = ScriptedInput::from_lines(["go east", "go upstairs", "pick up: key"]);
    let mut view = View::new();

    let ending = run_repl(&mut session, &mut view, &mut io).unwrap();
    assert_eq!(ending, Ending::Quit);
    assert_eq!(ending.exit_code(), 2);
    assert!(session.world.in_inventory("key"));
}
