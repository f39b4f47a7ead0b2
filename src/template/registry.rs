//! Block registry shared along an inheritance chain

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use strsim::levenshtein;

use crate::content_type::{BlockTypes, ContentType, TypeCheck};
use crate::error::RenderError;

use super::compiled::BlockFn;
use super::resolver::InstanceId;

/// Registry handle aliased by every instance of one chain
pub type SharedBlocks = Rc<RefCell<BlockRegistry>>;

/// One implementation of a block, bound to the instance that declared it
#[derive(Clone)]
pub struct BlockEntry {
    pub owner: InstanceId,
    pub body: BlockFn,
}

impl fmt::Debug for BlockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockEntry")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Implementations of one block name, most-derived first, with a read cursor
#[derive(Debug, Default)]
pub struct BlockStack {
    entries: Vec<BlockEntry>,
    cursor: usize,
}

impl BlockStack {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Owners of the implementations, most-derived first
    pub fn owners(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.entries.iter().map(|e| e.owner)
    }
}

/// Block name -> implementation stack, plus the recorded block content types
#[derive(Debug, Default)]
pub struct BlockRegistry {
    stacks: HashMap<String, BlockStack>,
    types: BlockTypes,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh registry handle for a new chain
    pub fn shared() -> SharedBlocks {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Append an implementation after every one registered so far
    pub fn push(&mut self, name: &str, entry: BlockEntry) {
        self.stacks
            .entry(name.to_string())
            .or_default()
            .entries
            .push(entry);
    }

    /// Run a block declaration through the content-type guard
    pub fn check_content_type(&mut self, declared: ContentType, name: &str) -> TypeCheck {
        self.types.check(declared, name)
    }

    pub fn content_type(&self, name: &str) -> Option<ContentType> {
        self.types.get(name)
    }

    pub fn stack(&self, name: &str) -> Option<&BlockStack> {
        self.stacks.get(name)
    }

    /// Whether at least one implementation of `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.stacks.get(name).is_some_and(|s| !s.is_empty())
    }

    /// Registered block names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stacks.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Position the cursor on the most-derived implementation and return it
    pub fn first(&mut self, name: &str, suggest: bool) -> Result<BlockEntry, RenderError> {
        match self.stacks.get_mut(name) {
            Some(stack) if !stack.is_empty() => {
                stack.cursor = 0;
                Ok(stack.entries[0].clone())
            }
            _ => {
                let suggestion = if suggest { self.suggest(name) } else { None };
                Err(RenderError::undefined_block(name, suggestion))
            }
        }
    }

    /// Move the cursor to the next less-derived implementation.
    ///
    /// Returns the entry together with the cursor position to restore once the
    /// entry has finished rendering.
    pub fn advance(&mut self, name: &str) -> Result<(BlockEntry, usize), RenderError> {
        let stack = self
            .stacks
            .get_mut(name)
            .ok_or_else(|| RenderError::undefined_parent_block(name))?;

        let previous = stack.cursor;
        let next = previous + 1;
        let entry = stack
            .entries
            .get(next)
            .cloned()
            .ok_or_else(|| RenderError::undefined_parent_block(name))?;
        stack.cursor = next;
        Ok((entry, previous))
    }

    /// Put the cursor back where it was before [`BlockRegistry::advance`]
    pub fn rewind(&mut self, name: &str, position: usize) {
        if let Some(stack) = self.stacks.get_mut(name) {
            stack.cursor = position;
        }
    }

    /// Closest registered block name to `name`
    pub fn suggest(&self, name: &str) -> Option<String> {
        find_similar(self.names(), name, 1).into_iter().next()
    }
}

/// Find names close to `target` by edit distance, closest first.
///
/// A candidate qualifies when it differs from `target` and is within a
/// quarter of the target's length plus one edit.
pub(crate) fn find_similar<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    target: &str,
    limit: usize,
) -> Vec<String> {
    let max_distance = target.chars().count() / 4 + 1;
    let mut scored: Vec<(&str, usize)> = candidates
        .into_iter()
        .map(|name| (name, levenshtein(name, target)))
        .filter(|(_, dist)| *dist > 0 && *dist <= max_distance)
        .collect();

    scored.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));
    scored
        .into_iter()
        .take(limit)
        .map(|(name, _)| name.to_string())
        .collect()
}
