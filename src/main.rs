use colored::Colorize;

use clap::Parser;
use meetup_union::report;
use meetup_union::{run_union_audit, Bootstrap, Pacing};

/// Count how many attendees of an event also belong to another Meetup group
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// String identifier found in your Meetup's URL
    own_meetup: String,

    /// String identifier found in the other Meetup's URL
    target_meetup: String,

    /// Numeric id found in the event's URL
    event_id: u64,
}

fn fail(message: impl std::fmt::Display) -> ! {
    println!("{}", message.to_string().bold().red());
    std::process::exit(1);
}

fn main() {
    let args = Args::parse();

    if args.own_meetup == args.target_meetup {
        fail("The two Meetups must be different");
    }

    let bootstrap = match Bootstrap::new() {
        Ok(b) => b,
        Err(e) => fail(e),
    };

    let states = match run_union_audit(
        &bootstrap,
        &args.own_meetup,
        &args.target_meetup,
        args.event_id,
        Pacing::default(),
    ) {
        Ok(states) => states,
        Err(e) => fail(format!("I couldn't finish the audit: {e}")),
    };

    if let Err(e) = report::print_results(&states, &args.own_meetup, &args.target_meetup) {
        fail(format!("I couldn't print the results: {e}"));
    }
}
