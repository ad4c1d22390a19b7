//! The thread graph linker.
//!
//! Takes a channel's merged flat message list and resolves the reply
//! relationships declared on it into a forest: every thread root owns its
//! children as a subtree, roots and children sorted ascending by timestamp
//! key.
//!
//! Links are resolved through a key-indexed map rather than back
//! references, and subtrees are *moved* out of that map, so the finished
//! forest cannot contain a reference cycle by construction. A malformed
//! archive whose declared reply chain loops back on itself leaves
//! unreachable entries in the map, which is reported as a graph error
//! instead of looping.
//!
//! Every failure here is a hard error: a duplicated key, a reply key with
//! no matching message, a key claimed by two roots, or a cycle.

use std::collections::HashMap;

use crate::error::{Result, SlackviewError};
use crate::message::Message;
use crate::timestamp::Ts;

/// Links a channel's messages into its ordered root forest.
pub fn link_messages(messages: Vec<Message>) -> Result<Vec<Message>> {
    // The timestamp key is the identity; a collision makes two messages
    // indistinguishable and the archive unusable.
    let mut by_key: HashMap<Ts, Message> = HashMap::with_capacity(messages.len());
    for message in messages {
        let key = message.ts;
        if by_key.insert(key, message).is_some() {
            return Err(SlackviewError::DuplicateTimestamp { ts: key });
        }
    }

    // child key → parent key, each child claimed exactly once.
    let mut parent_of: HashMap<Ts, Ts> = HashMap::new();
    for (key, message) in &by_key {
        for reply_key in &message.reply_keys {
            if !by_key.contains_key(reply_key) {
                return Err(SlackviewError::UnresolvedReply { ts: *reply_key });
            }
            if parent_of.insert(*reply_key, *key).is_some() {
                return Err(SlackviewError::DuplicateReply { ts: *reply_key });
            }
        }
    }

    let mut root_keys: Vec<Ts> = by_key
        .keys()
        .filter(|key| !parent_of.contains_key(key))
        .copied()
        .collect();
    root_keys.sort_unstable();

    let mut roots = Vec::with_capacity(root_keys.len());
    for key in root_keys {
        roots.push(extract_tree(key, &mut by_key)?);
    }

    // Whatever is still in the map declared a parent but was never reached
    // from any root: its reply chain is cyclic.
    if let Some(key) = by_key.keys().min() {
        return Err(SlackviewError::ReplyCycle { ts: *key });
    }

    Ok(roots)
}

/// Moves one message and, recursively, its declared children out of the
/// map. Nesting depth is whatever the archive declares.
fn extract_tree(key: Ts, by_key: &mut HashMap<Ts, Message>) -> Result<Message> {
    let mut message = by_key
        .remove(&key)
        .ok_or(SlackviewError::UnresolvedReply { ts: key })?;

    let mut child_keys = message.reply_keys.clone();
    child_keys.sort_unstable();
    for child_key in child_keys {
        message.children.push(extract_tree(child_key, by_key)?);
    }
    Ok(message)
}
