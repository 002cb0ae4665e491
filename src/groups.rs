use std::{thread::sleep, time::Duration};

use colored::Colorize;
use serde::Deserialize;

use crate::{Bootstrap, MeetupError, MemberId};

/// Meetup sometimes answers with a blank page, so a lookup gets one second chance
const GROUP_LOOKUP_ATTEMPTS: u8 = 2;

/// A group a member has joined
#[derive(Debug, Clone, Deserialize, Hash, Eq, PartialEq)]
pub struct Group {
    pub urlname: String,
}

#[derive(Debug, Deserialize)]
struct GroupsPage {
    results: Vec<Group>,
}

/// Somewhere we can ask which groups a member belongs to
pub trait GroupDirectory {
    fn groups_for_member(&self, member_id: MemberId) -> Result<Vec<Group>, MeetupError>;
}

impl GroupDirectory for Bootstrap {
    fn groups_for_member(&self, member_id: MemberId) -> Result<Vec<Group>, MeetupError> {
        let page: GroupsPage =
            self.make_meetup_request("2/groups", &[("member_id", member_id.to_string())])?;
        Ok(page.results)
    }
}

/// Return the urlnames of the groups `member_id` has joined.
///
/// A response we can't decode is retried once after `backoff`. If the retry
/// fails too, the member is skipped and reported with no groups. Any other
/// error is returned as is.
pub fn fetch_member_group_urlnames(
    directory: &impl GroupDirectory,
    member_id: MemberId,
    backoff: Duration,
) -> Result<Vec<String>, MeetupError> {
    let mut tries = 0;
    loop {
        tries += 1;
        match directory.groups_for_member(member_id) {
            Ok(groups) => return Ok(groups.into_iter().map(|g| g.urlname).collect()),
            Err(MeetupError::Decode(e)) => {
                if tries >= GROUP_LOOKUP_ATTEMPTS {
                    println!("{}: {}", "Retries exhausted".red(), e.to_string().red());
                    println!(
                        "{} {}",
                        "Unexpected api client error, skipping member".red(),
                        member_id.to_string().white()
                    );
                    return Ok(Vec::new());
                }

                println!(
                    "{}: {}",
                    "Going to retry because couldn't deserialize response from Meetup".yellow(),
                    e.to_string().red()
                );
                sleep(backoff);
            }
            Err(e) => return Err(e),
        }
    }
}
