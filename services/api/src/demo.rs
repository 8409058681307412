use crate::infra::InMemoryParticipantRepository;
use clap::Args;
use gift_exchange::error::AppError;
use gift_exchange::workflows::exchange::{
    DrawConfig, GiftExchangeService, GroupTag, ParticipantId, SignupRequest,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed the draw's random source for a reproducible run
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Skip the reveal portion of the demo
    #[arg(long)]
    pub(crate) skip_reveal: bool,
}

struct DemoSignup {
    name: &'static str,
    pin: &'static str,
    group: GroupTag,
}

const DEMO_ROSTER: [DemoSignup; 6] = [
    DemoSignup {
        name: "Astrid",
        pin: "1111",
        group: GroupTag::Adult,
    },
    DemoSignup {
        name: "Birger",
        pin: "2222",
        group: GroupTag::Adult,
    },
    DemoSignup {
        name: "Cornelia",
        pin: "3333",
        group: GroupTag::Adult,
    },
    DemoSignup {
        name: "David",
        pin: "4444",
        group: GroupTag::Adult,
    },
    DemoSignup {
        name: "Kim",
        pin: "5555",
        group: GroupTag::Child,
    },
    DemoSignup {
        name: "Lee",
        pin: "6666",
        group: GroupTag::Child,
    },
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryParticipantRepository::default());
    let service = GiftExchangeService::new(repository, DrawConfig::default());

    println!("Gift exchange demo");
    println!("\nSignup");
    let mut ids: Vec<ParticipantId> = Vec::new();
    for entry in &DEMO_ROSTER {
        let record = service.register(SignupRequest {
            name: entry.name.to_string(),
            pin: entry.pin.to_string(),
            group: entry.group,
            partner: None,
            food_preference: Some(format!("{} special", entry.name)),
            fun_fact: None,
        })?;
        println!(
            "- {} registered as {} ({})",
            entry.name,
            record.profile.id.0,
            entry.group.label()
        );
        ids.push(record.profile.id);
    }

    // One-sided partner link: only Astrid's record stores it, yet the draw
    // excludes the pair in both directions.
    service.set_partner(&ids[0], Some(ids[1].clone()))?;
    println!("- Astrid and Birger linked as partners (stored on Astrid only)");

    println!("\nDraw");
    let summary = match args.seed {
        Some(seed) => {
            println!("Using seeded random source ({seed})");
            service.run_draw_with_rng(&mut StdRng::seed_from_u64(seed))
        }
        None => service.run_draw(),
    };

    let summary = match summary {
        Ok(summary) => summary,
        Err(err) => {
            println!("Draw failed: {err}");
            return Ok(());
        }
    };

    println!("Assigned {} participants", summary.assigned);
    for report in &summary.groups {
        println!(
            "- {} pool: {} members, valid after {} attempt(s)",
            report.group.label(),
            report.members,
            report.attempts
        );
    }

    let status = service.status()?;
    println!(
        "Draw state: {} ({} participants, budget {}, deadline {})",
        status.status, status.participants, status.budget, status.deadline
    );

    if !args.skip_reveal {
        println!("\nReveal");
        match service.reveal(&ids[0], "0000") {
            Err(err) => println!("- Astrid with a wrong PIN: {err}"),
            Ok(_) => println!("- unexpected: wrong PIN accepted"),
        }
        match service.reveal(&ids[0], DEMO_ROSTER[0].pin)? {
            Some(target) => {
                let treat = target.food_preference.as_deref().unwrap_or("no preference");
                println!("- Astrid gives to {} ({})", target.name, treat);
            }
            None => println!("- no recipient recorded for Astrid"),
        }
    }

    println!("\nReset");
    service.reset_draw()?;
    let status = service.status()?;
    println!("Draw state after reset: {}", status.status);

    Ok(())
}
