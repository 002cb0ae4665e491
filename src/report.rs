use std::io::{self, Write};

use colored::Colorize;

use crate::membership::Membership;

/// How many attendees ended up in each membership state
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct StateCounts {
    pub own_only: usize,
    pub target_only: usize,
    pub both: usize,
    pub neither: usize,
}

impl StateCounts {
    pub fn tally<'a>(states: impl IntoIterator<Item = &'a Option<Membership>>) -> Self {
        states
            .into_iter()
            .fold(Self::default(), |mut counts, state| {
                match state {
                    Some(Membership::OwnOnly) => counts.own_only += 1,
                    Some(Membership::TargetOnly) => counts.target_only += 1,
                    Some(Membership::Both) => counts.both += 1,
                    None => counts.neither += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.own_only + self.target_only + self.both + self.neither
    }
}

/// Write the summary of a run to `out`
pub fn write_results(
    out: &mut impl Write,
    states: &[Option<Membership>],
    own_meetup: &str,
    target_meetup: &str,
) -> io::Result<()> {
    let counts = StateCounts::tally(states);

    write!(out, "{}", "\n".repeat(4))?;
    writeln!(out, "{}", "=".repeat(100).bold())?;
    writeln!(out, "Members of only {}: {}", own_meetup, counts.own_only)?;
    writeln!(out, "Members of only {}: {}", target_meetup, counts.target_only)?;
    writeln!(out, "Members both: {}", counts.both)?;
    writeln!(out, "Members of neither (private?): {}", counts.neither)?;
    Ok(())
}

/// Print the summary of a run on stdout
pub fn print_results(
    states: &[Option<Membership>],
    own_meetup: &str,
    target_meetup: &str,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_results(&mut out, states, own_meetup, target_meetup)
}
