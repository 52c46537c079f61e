// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reputation replies.
//!
//! Every registered node may answer an event once, scoring some of its peers. Targets do
//! not have to be registered nodes: a reply may nominate an outside identity.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::event_store::Event;
use crate::error::{ControllerError, Result};
use crate::registry::{Application, NodeRegistry};
use crate::types::{Action, Address, Entity, Score, Version};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub author: Address,
    /// Ordered as submitted.
    pub scores: Vec<Score>,
    pub submitted_at: Version,
}

impl Reply {
    pub fn score_for(&self, target: &Address) -> Option<i64> {
        self.scores.iter().find(|s| s.target == *target).map(|s| s.value)
    }
}

pub fn check_reply(
    nodes: &NodeRegistry,
    application: &Application,
    event: &Event,
    author: &Address,
    scores: &[Score],
) -> Result<()> {
    if event.is_solved() {
        return Err(ControllerError::InvalidState(format!(
            "event #{} is already solved",
            event.id
        )));
    }
    if !nodes.contains(author) {
        return Err(ControllerError::NotFound(Entity::Node(*author)));
    }
    if event.has_replied(author) {
        return Err(ControllerError::AlreadyDone(Action::Replied));
    }

    let peers = nodes.len().saturating_sub(1);
    if scores.len() > peers {
        return Err(ControllerError::InvalidInput(format!(
            "reply has {} scores but only {} peers are registered",
            scores.len(),
            peers
        )));
    }

    let mut seen: FxHashSet<Address> = FxHashSet::default();
    for score in scores {
        if score.target == *author {
            return Err(ControllerError::InvalidInput(
                "a node cannot score itself".to_string(),
            ));
        }
        if !seen.insert(score.target) {
            return Err(ControllerError::InvalidInput(format!(
                "target {} scored more than once",
                score.target
            )));
        }
    }

    if !application.multi_reply_allowed {
        for score in scores {
            for prior in event.replies() {
                match prior.score_for(&score.target) {
                    Some(value) if value != score.value => {
                        return Err(ControllerError::InvalidInput(format!(
                            "score {} for {} conflicts with {} from {}",
                            score.value, score.target, value, prior.author
                        )));
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

pub(crate) fn record_reply(event: &mut Event, author: Address, scores: Vec<Score>, at: Version) -> &Reply {
    event
        .replies
        .entry(author)
        .or_insert(Reply {
            author,
            scores,
            submitted_at: at,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApplicationId, EventId};

    fn setup(multi: bool) -> (NodeRegistry, Application, Event) {
        let mut nodes = NodeRegistry::new();
        for i in 1..=3 {
            nodes.register(Address::from_low_u64(i), "SPECS".into(), Version(i));
        }
        let app = Application {
            id: ApplicationId(1),
            info: "APP_INFO".into(),
            required_specs: vec!["CTR_INFO".into()],
            multi_reply_allowed: multi,
            owner: Address::from_low_u64(1),
            created_at: Version(4),
        };
        let event = Event::new(EventId(1), ApplicationId(1), "EVENT".into(), Address::from_low_u64(1), Version(5));
        (nodes, app, event)
    }

    #[test]
    fn self_score_is_rejected() {
        let (nodes, app, event) = setup(false);
        let me = Address::from_low_u64(1);
        let err = check_reply(&nodes, &app, &event, &me, &[Score::new(me, 1)]).unwrap_err();
        assert!(matches!(err, ControllerError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_target_is_rejected() {
        let (nodes, app, event) = setup(false);
        let me = Address::from_low_u64(1);
        let peer = Address::from_low_u64(2);
        let err = check_reply(&nodes, &app, &event, &me, &[Score::new(peer, 1), Score::new(peer, 0)]).unwrap_err();
        assert!(matches!(err, ControllerError::InvalidInput(_)));
    }

    #[test]
    fn too_many_scores_are_rejected() {
        let (nodes, app, event) = setup(true);
        let me = Address::from_low_u64(1);
        let scores = [
            Score::new(Address::from_low_u64(2), 0),
            Score::new(Address::from_low_u64(3), 0),
            Score::new(Address::from_low_u64(4), 0),
        ];
        assert!(check_reply(&nodes, &app, &event, &me, &scores).is_err());
        assert!(check_reply(&nodes, &app, &event, &me, &scores[..2]).is_ok());
    }

    #[test]
    fn unregistered_author_is_not_found() {
        let (nodes, app, event) = setup(false);
        let stranger = Address::from_low_u64(42);
        assert_eq!(
            check_reply(&nodes, &app, &event, &stranger, &[]),
            Err(ControllerError::NotFound(Entity::Node(stranger)))
        );
    }

    #[test]
    fn conflicting_scores_depend_on_multi_reply_flag() {
        let target = Address::from_low_u64(3);
        for multi in [false, true] {
            let (nodes, app, mut event) = setup(multi);
            record_reply(&mut event, Address::from_low_u64(1), vec![Score::new(target, 1)], Version(6));

            let second = Address::from_low_u64(2);
            let agreeing = check_reply(&nodes, &app, &event, &second, &[Score::new(target, 1)]);
            let conflicting = check_reply(&nodes, &app, &event, &second, &[Score::new(target, 0)]);
            assert!(agreeing.is_ok());
            assert_eq!(conflicting.is_ok(), multi);
        }
    }
}
