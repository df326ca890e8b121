//! Properties that hold for every room of the built-in world.
mod common;

use common::{run, session};
use tinyquest::adventure::{Direction, Enemy, GameSession, WorldSeed};

/// Put the player in `room_id` by walking there, picking up the key on the way.
fn walk_to(game: &mut GameSession, room_id: &str) {
    let route: &[&str] = match room_id {
        "clearing" => &[],
        "cave" => &["go north"],
        "river" => &["go east"],
        "tower" => &["go north", "take silver key", "go south", "go east", "go north"],
        other => panic!("no route to {}", other),
    };
    for cmd in route {
        run(game, cmd);
    }
    assert_eq!(game.player().location, room_id);
}

#[test]
fn missing_exits_never_move_the_player() {
    let seed = WorldSeed::canonical().unwrap();
    for room in seed.rooms() {
        for dir in Direction::ALL {
            if room.exits.contains_key(&dir) {
                continue;
            }
            let mut game = session(1);
            walk_to(&mut game, &room.id);
            let snap = run(&mut game, &format!("go {}", dir));
            assert_eq!(game.player().location, room.id, "moved {} from {}", dir, room.id);
            assert_eq!(
                snap.room_description,
                format!("You can't go {} from here.", dir)
            );
        }
    }
}

#[test]
fn unparseable_direction_is_echoed() {
    let mut game = session(1);
    let snap = run(&mut game, "go sideways");
    assert_eq!(snap.room_description, "You can't go sideways from here.");
    assert_eq!(game.player().location, "clearing");
}

#[test]
fn direction_abbreviations_move() {
    let mut game = session(1);
    run(&mut game, "go n");
    assert_eq!(game.player().location, "cave");
    run(&mut game, "go S");
    assert_eq!(game.player().location, "clearing");
}

#[test]
fn locked_exits_need_their_item() {
    let seed = WorldSeed::canonical().unwrap();
    for room in seed.rooms() {
        for (dir, required) in &room.locked {
            let target = &room.exits[dir];

            let mut without = session(1);
            walk_to(&mut without, &room.id);
            // Drop the key if the route picked it up.
            if without.player().has_item(required) {
                run(&mut without, &format!("drop {}", required));
            }
            let blocked = run(&mut without, &format!("go {}", dir));
            assert_eq!(without.player().location, room.id);
            assert_eq!(
                blocked.room_description,
                format!("The path {} is locked. You need the {}.", dir, required)
            );

            let mut with = session(1);
            run(&mut with, "go north");
            run(&mut with, &format!("take {}", required));
            run(&mut with, "go south");
            walk_to(&mut with, &room.id);
            run(&mut with, &format!("go {}", dir));
            assert_eq!(&with.player().location, target);
        }
    }
}

#[test]
fn take_then_drop_round_trips() {
    let seed = WorldSeed::canonical().unwrap();
    for room in seed.rooms() {
        for item in &room.items {
            let mut game = session(1);
            walk_to(&mut game, &room.id);
            let before_items = game.current_room().unwrap().items.clone();
            let before_inventory = game.player().inventory.clone();

            let took = run(&mut game, &format!("take {}", item));
            assert_eq!(took.room_description, format!("You picked up the {}.", item));
            let dropped = run(&mut game, &format!("drop {}", item));
            assert_eq!(dropped.room_description, format!("You dropped the {}.", item));

            let mut after_items = game.current_room().unwrap().items.clone();
            let mut expected = before_items.clone();
            after_items.sort();
            expected.sort();
            assert_eq!(after_items, expected);
            assert_eq!(game.player().inventory, before_inventory);
        }
    }
}

#[test]
fn taking_absent_items_changes_nothing() {
    let mut game = session(1);
    let snap = run(&mut game, "take sword");
    assert_eq!(snap.room_description, "There is no sword here.");
    assert!(snap.inventory.is_empty());
    assert_eq!(snap.items, vec!["map", "apple", "torch"]);

    let dropped = run(&mut game, "drop sword");
    assert_eq!(dropped.room_description, "You don’t have sword.");
}

#[test]
fn reset_restores_the_seed() {
    let mut game = session(8);
    for cmd in [
        "take map",
        "take apple",
        "go north",
        "take sword",
        "take silver key",
        "fight",
        "fight",
        "go south",
        "go east",
        "take shield",
        "drop map",
        "go north",
        "take ancient book",
        "look",
    ] {
        run(&mut game, cmd);
    }

    let snap = game.reset().unwrap();
    assert!(snap.room_description.contains("forest clearing"));
    assert!(!snap.game_over);
    assert_eq!(snap.health, 100);
    assert!(snap.inventory.is_empty());
    assert_eq!(game.player().location, "clearing");

    let world = game.world();
    assert_eq!(world.room("clearing").unwrap().items, vec!["map", "apple", "torch"]);
    let cave = world.room("cave").unwrap();
    assert_eq!(cave.items, vec!["torch", "old coin", "silver key", "sword"]);
    assert_eq!(cave.enemy, Some(Enemy::new("giant spider", 30, 4)));
    assert_eq!(
        world.room("river").unwrap().items,
        vec!["fishing rod", "shield"]
    );
    let tower = world.room("tower").unwrap();
    assert_eq!(tower.items, vec!["ancient book"]);
    assert_eq!(tower.enemy, Some(Enemy::new("shadow beast", 50, 8)));
}

#[test]
fn reset_is_idempotent() {
    let mut game = session(4);
    run(&mut game, "go north");
    run(&mut game, "take torch");
    let first = game.reset().unwrap();
    let second = game.reset().unwrap();
    assert_eq!(first, second);
}
