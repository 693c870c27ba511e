use blackjack_core::{Action, Observation, RoundOutcome, Table, TableRules};

fn dealer_turn(table: &mut Table, round: &mut blackjack_core::RoundState) {
    let dealer = round.dealer();
    while !round.legal_actions(dealer).is_empty() {
        let action = if round.value(dealer).total() < 17 {
            Action::Hit
        } else {
            Action::Stand
        };
        table.apply(round, dealer, action).expect("dealer move is legal");
    }
}

#[test]
fn full_rounds_finish_every_seat() {
    let mut table = Table::with_seed(TableRules::with_decks(4), 20251018).expect("rules valid");

    for _ in 0..50 {
        let mut round = table.deal(3).expect("deal succeeds");
        let players: Vec<_> = round.players().collect();
        for seat in players {
            while !round.legal_actions(seat).is_empty() {
                let obs = Observation::new(&round, seat);
                assert!(obs.is_masked());
                let action = if obs.value().total() < 15 {
                    Action::Hit
                } else {
                    Action::Stand
                };
                table.apply(&mut round, seat, action).expect("legal move");
            }
        }
        dealer_turn(&mut table, &mut round);

        for seat in round.turn_order() {
            assert!(round.has_stood(seat));
        }
        for seat in round.players() {
            let outcome = round.outcome(seat);
            if round.score(seat) == 0 {
                assert_eq!(outcome, RoundOutcome::Loss);
            }
        }
        table.collect(round);
    }

    assert_eq!(table.rounds_dealt(), 50);
}

#[test]
fn observation_never_reveals_hole_card_to_players() {
    let mut table = Table::with_seed(TableRules::default(), 5).expect("rules valid");
    let round = table.deal(1).expect("deal");
    let player = round.players().next().expect("one player");
    let obs = Observation::new(&round, player);
    assert_eq!(obs.dealer_cards().len(), 1);
    assert_eq!(
        obs.dealer_cards()[0],
        round.hand(round.dealer()).cards()[1]
    );
}
