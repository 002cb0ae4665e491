use std::collections::HashSet;

/// Which of the two groups an attendee belongs to.
///
/// Attendees in neither group, or whose groups are private, have no membership at all.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Membership {
    OwnOnly,
    TargetOnly,
    Both,
}

/// Classify a member from the urlnames of the groups they joined
pub fn get_membership_state(
    urlnames: &[String],
    own_meetup: &str,
    target_meetup: &str,
) -> Option<Membership> {
    let joined: HashSet<&str> = urlnames.iter().map(String::as_str).collect();
    let in_own = joined.contains(own_meetup);
    let in_target = joined.contains(target_meetup);

    match (in_own, in_target) {
        // Probably someone with their groups set to private
        (false, false) => None,
        (true, true) => Some(Membership::Both),
        (false, true) => Some(Membership::TargetOnly),
        (true, false) => Some(Membership::OwnOnly),
    }
}
