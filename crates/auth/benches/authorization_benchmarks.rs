use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use gatekeep_auth::{
    ban, register, register_check, role_change, status_change, AccountStatus, BanDuration,
    NewAccount, Requester, Role,
};
use gatekeep_core::AccountId;

fn new_account(username: &str) -> NewAccount {
    NewAccount {
        id: AccountId::new(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        credential_hash: String::new(),
        avatar: "/uploads/default/avatar.png".to_string(),
    }
}

fn bench_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("decisions");
    let now = Utc::now();

    let admin = register(new_account("admin"), now);
    let admin = gatekeep_auth::Account {
        role: Role::Admin,
        ..admin
    };
    let requester = Requester::of(&admin);
    let target = register(new_account("target"), now);

    group.bench_function("role_change", |b| {
        b.iter(|| role_change(black_box(&requester), black_box(&target), Role::Editor))
    });
    group.bench_function("status_change", |b| {
        b.iter(|| status_change(black_box(&requester), black_box(&target), AccountStatus::Passive))
    });
    group.bench_function("ban_one_month", |b| {
        b.iter(|| {
            ban(
                black_box(&requester),
                black_box(&target),
                "spam",
                BanDuration::OneMonth,
                now,
            )
        })
    });

    group.finish();
}

fn bench_register_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_check");
    let now = Utc::now();

    for holder_count in [1usize, 10, 100, 1000].iter() {
        let holders: Vec<_> = (0..*holder_count)
            .map(|i| register(new_account(&format!("user{i}")), now))
            .collect();

        group.throughput(Throughput::Elements(*holder_count as u64));
        group.bench_with_input(
            BenchmarkId::new("holders", holder_count),
            &holders,
            |b, holders| {
                b.iter(|| {
                    register_check(
                        black_box("newcomer"),
                        black_box("newcomer@example.com"),
                        holders,
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_decisions, bench_register_check);
criterion_main!(benches);
