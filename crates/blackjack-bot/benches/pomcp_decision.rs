use blackjack_bot::{Policy, PomcpConfig, PomcpPolicy, RoundContext, SearchBudget};
use blackjack_core::{Card, Observation, RoundState, Seat, Shoe};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

fn opening(player: [Card; 2], upcard: Card) -> Observation {
    let state = RoundState::from_hands(
        Shoe::new(2),
        vec![player.to_vec(), vec![Card::Nine, upcard]],
        false,
    )
    .expect("scenario cards are available in a fresh shoe");
    Observation::new(&state, Seat::new(0))
}

fn bench_first_decision(c: &mut Criterion) {
    let mut group = c.benchmark_group("pomcp_decision");

    let cases = [
        ("hard12_vs_2", [Card::Ten, Card::Two], Card::Two),
        ("soft17_vs_10", [Card::Ace, Card::Six], Card::Ten),
        ("hard16_vs_7", [Card::Nine, Card::Seven], Card::Seven),
    ];

    for simulations in [200usize, 1_000] {
        for (label, player, upcard) in cases {
            let obs = opening(player, upcard);
            group.bench_function(format!("{label}_sims{simulations}"), |b| {
                b.iter_batched(
                    || {
                        PomcpPolicy::new(
                            PomcpConfig::default().with_seed(42),
                            SearchBudget::Simulations(simulations),
                        )
                        .expect("default config is valid")
                    },
                    |mut policy| {
                        let mut ctx = RoundContext::new();
                        let _ = policy.decide(&obs, &mut ctx);
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_first_decision);
criterion_main!(benches);
