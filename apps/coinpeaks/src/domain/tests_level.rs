use super::cards_types::Suit;
use super::errors::LevelError;
use super::fixtures::face;
use super::level::{LevelCatalog, LevelData, Slot};

const TWO_SLOT_LEVEL: &str = r#"{
    "id": "intro-1",
    "wasteCard": { "suit": "hearts", "rank": 5 },
    "stockPile": [{ "suit": "clubs", "rank": 9 }, { "suit": "S", "rank": "K" }],
    "layout": [
        { "suit": "clubs", "rank": 9, "x": 400, "y": 300 },
        { "suit": "spades", "rank": 6, "x": 400, "y": 400, "angle": 12.5, "covers": [0] }
    ]
}"#;

#[test]
fn parses_authored_level() {
    let level: LevelData = TWO_SLOT_LEVEL.parse().unwrap();
    assert_eq!(level.id, "intro-1");
    assert_eq!(level.waste_card, face(Suit::Hearts, 5));
    assert_eq!(level.stock_pile.len(), 2);
    assert_eq!(level.layout[1].covers, vec![0]);
    assert_eq!(level.layout[1].angle, 12.5);
    assert_eq!(level.total_cards(), 5);

    let board = level.to_board();
    let base = board.tableau()[0];
    let top = board.tableau()[1];
    assert_eq!(board.card(base).unwrap().covered_by, vec![top]);
    assert!(!board.card(base).unwrap().face_up);
    assert!(board.card(top).unwrap().face_up);
    // Last stock entry is the top of the pile.
    let top_stock = *board.stock().last().unwrap();
    assert_eq!(board.card(top_stock).unwrap().face, face(Suit::Spades, 13));
    assert!(board.check_partition());
}

#[test]
fn malformed_slots_are_skipped_and_covers_remapped() {
    let json = r#"{
        "id": "messy",
        "wasteCard": { "suit": "hearts", "rank": 5 },
        "stockPile": [{ "suit": "moons", "rank": 3 }, { "suit": "clubs", "rank": 2 }],
        "layout": [
            { "suit": "clubs", "rank": 99, "x": 0, "y": 0 },
            { "suit": "clubs", "rank": 4, "x": 100, "y": 100 },
            { "suit": "clubs", "rank": 8 },
            { "suit": "spades", "rank": 6, "x": 100, "y": 200, "covers": [0, 1, 2, 7, -1, "x", 3] }
        ]
    }"#;
    let level: LevelData = json.parse().unwrap();
    assert_eq!(level.layout.len(), 2);
    assert_eq!(level.stock_pile.len(), 1);
    // Only the cover pointing at the surviving slot 1 remains, remapped to 0.
    assert_eq!(level.layout[1].covers, vec![0]);
}

#[test]
fn missing_waste_falls_back_to_stock_top() {
    let json = r#"{
        "id": "no-waste",
        "wasteCard": { "suit": "hearts" },
        "stockPile": [{ "suit": "clubs", "rank": 2 }, { "suit": "clubs", "rank": 3 }],
        "layout": [{ "suit": "clubs", "rank": 4, "x": 1, "y": 1 }]
    }"#;
    let level: LevelData = json.parse().unwrap();
    assert_eq!(level.waste_card, face(Suit::Clubs, 3));
    assert_eq!(level.stock_pile, vec![face(Suit::Clubs, 2)]);
}

#[test]
fn unusable_documents_are_rejected() {
    let no_waste = r#"{ "id": "x", "layout": [{ "suit": "c", "rank": 1, "x": 0, "y": 0 }] }"#;
    assert_eq!(
        no_waste.parse::<LevelData>(),
        Err(LevelError::MissingWaste {
            level: "x".to_string()
        })
    );

    let no_slots = r#"{ "id": "y", "wasteCard": { "suit": "c", "rank": 1 }, "layout": [] }"#;
    assert_eq!(
        no_slots.parse::<LevelData>(),
        Err(LevelError::Empty {
            level: "y".to_string()
        })
    );

    assert!(matches!(
        "not json".parse::<LevelData>(),
        Err(LevelError::Parse(_))
    ));
}

#[test]
fn serialized_level_parses_back() {
    let level: LevelData = TWO_SLOT_LEVEL.parse().unwrap();
    let json = level.to_json().unwrap();
    let again: LevelData = json.parse().unwrap();
    assert_eq!(again, level);
}

#[test]
fn catalog_cycles_through_levels() {
    let catalog = LevelCatalog::generated(3, 11);
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.level_for(0).unwrap().id, "dealt-001");
    assert_eq!(catalog.level_for(4).unwrap().id, "dealt-002");
    assert!(LevelCatalog::default().level_for(0).is_none());
}

#[tokio::test]
async fn catalog_loads_sorted_json_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.json"), TWO_SLOT_LEVEL.replace("intro-1", "second")).unwrap();
    std::fs::write(dir.path().join("a.json"), TWO_SLOT_LEVEL).unwrap();
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let catalog = LevelCatalog::load_dir(dir.path()).await.unwrap();
    let ids: Vec<_> = catalog.levels().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["intro-1", "second"]);

    let missing = LevelCatalog::load_dir(&dir.path().join("nope")).await;
    assert!(matches!(missing, Err(LevelError::Io { .. })));
}

#[test]
fn oversized_level_keeps_card_ids_distinct() {
    let slots = usize::from(u16::MAX) + 2;
    let level = LevelData {
        id: "huge".to_string(),
        waste_card: face(Suit::Hearts, 5),
        stock_pile: vec![face(Suit::Clubs, 9)],
        layout: (0..slots)
            .map(|i| Slot {
                face: face(Suit::Spades, 1 + (i % 13) as u8),
                x: (i % 100) as f64 * 10.0,
                y: (i / 100) as f64 * 10.0,
                angle: 0.0,
                covers: Vec::new(),
            })
            .collect(),
    };

    let board = level.to_board();
    assert_eq!(board.tableau().len(), slots);
    assert!(board.check_partition());
    let last = board.tableau()[slots - 1];
    assert_eq!(last.index(), slots);
    assert_ne!(last, board.waste_card());
    assert_eq!(board.total_cards(), slots + 2);
}
