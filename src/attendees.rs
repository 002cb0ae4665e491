use serde::Deserialize;

use crate::{Bootstrap, MeetupError, MemberId};

/// The member who sent an RSVP
#[derive(Debug, Deserialize, Eq, PartialEq)]
struct AttendanceMember {
    id: MemberId,
}

/// One entry of an event's attendance list
#[derive(Debug, Deserialize, Eq, PartialEq)]
struct AttendanceRecord {
    member: AttendanceMember,
}

/// Return the ids of every member who RSVP'd to `event_id`, in the order Meetup lists them.
///
/// This returns all RSVPs, whatever their response. There is no retry: if this
/// fails there is nothing to audit.
pub fn fetch_attendee_ids(
    bootstrap: &Bootstrap,
    own_meetup: &str,
    event_id: u64,
) -> Result<Vec<MemberId>, MeetupError> {
    let records: Vec<AttendanceRecord> = bootstrap.make_meetup_request(
        &format!(
            "{}/events/{}/attendance",
            urlencoding::encode(own_meetup),
            event_id
        ),
        &[],
    )?;

    Ok(attendee_ids(records))
}

fn attendee_ids(records: Vec<AttendanceRecord>) -> Vec<MemberId> {
    records.into_iter().map(|r| r.member.id).collect()
}
