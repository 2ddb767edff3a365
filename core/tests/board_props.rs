use proptest::prelude::*;
use sweeper_core::{Cell, GameConfig, RevealOutcome, Session};

/// Boards large enough that the worst-case first-reveal exclusion zone is a
/// full 3x3 block, with every mine count the config validation accepts.
fn arb_config() -> impl Strategy<Value = GameConfig> {
    (3u8..=10, 3u8..=10)
        .prop_flat_map(|(height, width)| {
            let max_mines = height as u16 * width as u16 - 9;
            (Just(height), Just(width), 0u16..=max_mines)
        })
        .prop_map(|(height, width, mines)| GameConfig::new(height, width, mines).unwrap())
}

fn arb_board() -> impl Strategy<Value = (GameConfig, u64, u16)> {
    arb_config().prop_flat_map(|config| {
        let total = config.total_cells();
        (Just(config), any::<u64>(), 0..total)
    })
}

proptest! {
    #[test]
    fn index_coordinate_round_trip((config, _, index) in arb_board()) {
        let coords = config.coordinate_of(index).unwrap();
        prop_assert_eq!(config.index_of(coords).unwrap(), index);

        let (row, col) = coords;
        prop_assert!(row < config.height);
        prop_assert!(col < config.width);
    }

    #[test]
    fn first_reveal_places_mines_outside_the_exclusion_zone(
        (config, seed, first) in arb_board()
    ) {
        let mut session = Session::new(config, seed);
        let start = config.coordinate_of(first).unwrap();

        let outcome = session.reveal(start).unwrap();
        prop_assert_ne!(outcome, RevealOutcome::Exploded);

        let mut mine_count = 0u16;
        for index in 0..config.total_cells() {
            let coords = config.coordinate_of(index).unwrap();
            if session.has_mine_at(coords) {
                mine_count += 1;
            }
        }
        prop_assert_eq!(mine_count, config.mines);

        prop_assert!(!session.has_mine_at(start));
        for pos in session.neighbors(start) {
            prop_assert!(!session.has_mine_at(pos));
        }
    }

    #[test]
    fn flood_fill_reveals_no_mine_and_counts_match(
        (config, seed, first) in arb_board(),
        later in proptest::collection::vec(any::<u16>(), 0..20)
    ) {
        let mut session = Session::new(config, seed);
        let start = config.coordinate_of(first).unwrap();
        session.reveal(start).unwrap();

        for pick in later {
            let index = pick % config.total_cells();
            let coords = config.coordinate_of(index).unwrap();
            // direct mine reveals would end the game, keep it running
            if session.has_mine_at(coords) {
                continue;
            }
            session.reveal(coords).unwrap();
        }

        let snapshot = session.snapshot();
        let mut revealed = 0u16;
        for (index, cell) in snapshot.iter().enumerate() {
            let coords = config.coordinate_of(index as u16).unwrap();
            match cell {
                Cell::Revealed(count) => {
                    revealed += 1;
                    prop_assert!(!session.has_mine_at(coords));
                    prop_assert!(*count <= 8);
                }
                Cell::Mine => prop_assert!(false, "no mine may be revealed here"),
                Cell::Hidden | Cell::Flagged => {}
            }
        }
        prop_assert_eq!(revealed, session.revealed_count());
        prop_assert!(session.revealed_count() <= config.safe_cells());
        prop_assert_eq!(
            session.is_complete(),
            session.revealed_count() == config.safe_cells()
        );
    }

    #[test]
    fn zero_cells_never_border_a_hidden_safe_region(
        (config, seed, first) in arb_board()
    ) {
        let mut session = Session::new(config, seed);
        let start = config.coordinate_of(first).unwrap();
        session.reveal(start).unwrap();

        // every revealed zero cell must have all its neighbors revealed
        for index in 0..config.total_cells() {
            let coords = config.coordinate_of(index).unwrap();
            if session.cell_at(coords) == Cell::Revealed(0) {
                for pos in session.neighbors(coords) {
                    prop_assert!(
                        matches!(session.cell_at(pos), Cell::Revealed(_)),
                        "zero cell {:?} borders unrevealed {:?}", coords, pos
                    );
                }
            }
        }
    }

    #[test]
    fn double_flag_toggle_restores_hidden(
        (config, seed, target) in arb_board()
    ) {
        let mut session = Session::new(config, seed);
        let coords = config.coordinate_of(target).unwrap();

        session.toggle_flag(coords).unwrap();
        prop_assert_eq!(session.cell_at(coords), Cell::Flagged);
        session.toggle_flag(coords).unwrap();
        prop_assert_eq!(session.cell_at(coords), Cell::Hidden);
        prop_assert_eq!(session.flagged_count(), 0);
    }
}
