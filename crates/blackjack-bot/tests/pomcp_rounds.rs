use blackjack_bot::{
    AgentPolicy, Policy, PolicySpec, PomcpConfig, PomcpPolicy, RoundContext, SearchBudget,
    ThresholdPolicy,
};
use blackjack_core::{Observation, Seat, Table, TableRules};

fn play_round(table: &mut Table, agent: &mut dyn Policy) -> (u8, usize) {
    let mut round = table.deal(1).expect("deal");
    let seat = Seat::new(0);
    let mut ctx = RoundContext::new();
    let mut decisions = 0;
    while !round.legal_actions(seat).is_empty() {
        let obs = Observation::new(&round, seat);
        let action = agent.decide(&obs, &mut ctx).expect("decision");
        table.apply(&mut round, seat, action).expect("legal action");
        decisions += 1;
    }
    let score = round.score(seat);
    table.collect(round);
    (score, decisions)
}

#[test]
fn pomcp_agent_finishes_every_round() {
    let mut table = Table::with_seed(TableRules::default(), 2024).unwrap();
    let mut agent = PomcpPolicy::new(
        PomcpConfig::default().with_seed(1),
        SearchBudget::Simulations(100),
    )
    .unwrap();

    for _ in 0..20 {
        let (score, decisions) = play_round(&mut table, &mut agent);
        assert!(score <= 22);
        assert!(decisions >= 1);
        assert!(agent.last_report().is_some());
    }
    assert_eq!(table.rounds_dealt(), 20);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut table = Table::with_seed(TableRules::with_decks(1), 77).unwrap();
        let mut agent = PolicySpec::Pomcp {
            planner: PomcpConfig::default(),
            simulations: 64,
            time_limit_ms: None,
        }
        .build(Some(5))
        .unwrap();
        (0..10)
            .map(|_| play_round(&mut table, &mut agent))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn threshold_agent_never_stands_below_target() {
    let mut table = Table::with_seed(TableRules::default(), 9).unwrap();
    let mut agent = AgentPolicy::Threshold(ThresholdPolicy::default());
    for _ in 0..50 {
        let (score, _) = play_round(&mut table, &mut agent);
        assert!(score == 0 || score >= 17, "stood on {score}");
    }
}
