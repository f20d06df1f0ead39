//! Compiled rule table.
//!
//! [`RuleTable::build`] validates a [`LexerDefinition`] and compiles every
//! pattern once. The resulting table is immutable and `Send + Sync`, so a
//! single table can drive any number of scans on any number of threads.

use std::fmt;

use indexmap::IndexMap;
use regex_automata::meta::Regex;
use regex_automata::{Anchored, Input};
use tracing::debug;

use crate::definition::{LexerDefinition, LexerInfo, RuleDef, POP_STATE};
use crate::error::ConfigError;
use crate::scanner::Scanner;
use crate::token::TokenCategory;

/// Dense identifier of a lexer state inside one [`RuleTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    fn from_usize(index: usize) -> Self {
        // State counts come from config files and stay far below u32::MAX
        StateId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Position of the state in its table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What happens to the state stack after a rule matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Push the given state; it becomes the active state
    Push(StateId),
    /// Pop the active state; the entry state is never popped
    Pop,
}

/// A single compiled rule.
#[derive(Clone)]
pub struct Rule {
    pattern: Regex,
    source: String,
    category: TokenCategory,
    consumes: bool,
    transition: Option<Transition>,
    lookbehind: Option<Regex>,
}

impl Rule {
    /// The pattern as written in the definition.
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// Category of the tokens this rule emits.
    pub fn category(&self) -> TokenCategory {
        self.category
    }

    /// `false` for lookahead rules.
    pub fn consumes(&self) -> bool {
        self.consumes
    }

    /// State change applied after a match.
    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// Whether the rule carries a lookbehind constraint.
    pub fn has_lookbehind(&self) -> bool {
        self.lookbehind.is_some()
    }

    /// Tries the rule anchored at byte offset `at` of `haystack`.
    ///
    /// Returns the end offset of the token on success. The whole haystack is
    /// visible to the regex, so `\b` at `at` looks at the preceding
    /// character. Matches that would produce an empty token are rejected.
    pub(crate) fn match_at(&self, haystack: &str, at: usize) -> Option<usize> {
        if let Some(lookbehind) = &self.lookbehind {
            let previous = haystack[..at].chars().next_back()?;
            let input = Input::new(haystack)
                .span(at - previous.len_utf8()..at)
                .anchored(Anchored::Yes);
            if lookbehind.search(&input)?.end() != at {
                return None;
            }
        }

        let input = Input::new(haystack)
            .span(at..haystack.len())
            .anchored(Anchored::Yes);
        let end = if self.consumes {
            self.pattern.search(&input)?.end()
        } else {
            let mut caps = self.pattern.create_captures();
            self.pattern.search_captures(&input, &mut caps);
            let body = caps.get_group(1)?;
            if body.start != at {
                return None;
            }
            body.end
        };
        (end > at).then_some(end)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.source)
            .field("category", &self.category)
            .field("consumes", &self.consumes)
            .field("transition", &self.transition)
            .field("lookbehind", &self.lookbehind.is_some())
            .finish()
    }
}

/// Prioritised rules grouped into named states.
#[derive(Clone, Debug)]
pub struct RuleTable {
    info: LexerInfo,
    states: IndexMap<String, Vec<Rule>>,
    entry: StateId,
    fallback: TokenCategory,
}

impl RuleTable {
    /// Validates and compiles a definition.
    ///
    /// Fails if the entry state is missing, a rule targets an undefined
    /// state, a pattern or lookbehind does not compile, or a lookahead rule
    /// lacks the capture group that marks its token.
    pub fn build(definition: &LexerDefinition) -> Result<Self, ConfigError> {
        let header = &definition.header;
        let entry = definition
            .states
            .get_index_of(&header.entry)
            .map(StateId::from_usize)
            .ok_or_else(|| ConfigError::MissingEntryState {
                entry: header.entry.clone(),
            })?;

        let mut states = IndexMap::with_capacity(definition.states.len());
        for (name, defs) in &definition.states {
            let rules = defs
                .iter()
                .enumerate()
                .map(|(index, def)| compile_rule(definition, name, index, def))
                .collect::<Result<Vec<_>, _>>()?;
            states.insert(name.clone(), rules);
        }

        let table = Self {
            info: header.info(),
            states,
            entry,
            fallback: header.fallback,
        };
        debug!(
            lexer = %table.info.name,
            states = table.state_count(),
            rules = table.rule_count(),
            "built rule table"
        );
        Ok(table)
    }

    /// Ordered rules of `state`; empty for an id from another table.
    pub fn rules_for(&self, state: StateId) -> &[Rule] {
        self.states
            .get_index(state.index())
            .map(|(_, rules)| rules.as_slice())
            .unwrap_or(&[])
    }

    /// Looks up a state by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.get_index_of(name).map(StateId::from_usize)
    }

    /// Name of a state.
    pub fn state_name(&self, state: StateId) -> Option<&str> {
        self.states
            .get_index(state.index())
            .map(|(name, _)| name.as_str())
    }

    /// State every scan starts in.
    pub fn entry_state(&self) -> StateId {
        self.entry
    }

    /// Category of characters no rule matches.
    pub fn fallback(&self) -> TokenCategory {
        self.fallback
    }

    /// Lexer metadata.
    pub fn info(&self) -> &LexerInfo {
        &self.info
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of rules across all states.
    pub fn rule_count(&self) -> usize {
        self.states.values().map(Vec::len).sum()
    }

    /// Iterates over `(id, name, rules)` in table order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &str, &[Rule])> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, (name, rules))| (StateId::from_usize(i), name.as_str(), rules.as_slice()))
    }

    /// A scanner driven by this table.
    pub fn scanner(&self) -> Scanner<'_> {
        Scanner::new(self)
    }
}

fn compile_rule(
    definition: &LexerDefinition,
    state: &str,
    index: usize,
    def: &RuleDef,
) -> Result<Rule, ConfigError> {
    let pattern = Regex::new(&def.pattern).map_err(|e| ConfigError::InvalidPattern {
        state: state.to_string(),
        index,
        pattern: def.pattern.clone(),
        source: Box::new(e),
    })?;

    // captures_len counts the implicit whole-match group
    if !def.consumes && pattern.captures_len() < 2 {
        return Err(ConfigError::MissingCapture {
            state: state.to_string(),
            index,
            pattern: def.pattern.clone(),
        });
    }

    let lookbehind = def
        .lookbehind
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| ConfigError::InvalidLookbehind {
            state: state.to_string(),
            index,
            pattern: def.lookbehind.clone().unwrap_or_default(),
            source: Box::new(e),
        })?;

    let transition = match def.next.as_deref() {
        None => None,
        Some(POP_STATE) => Some(Transition::Pop),
        Some(target) => {
            let id = definition.states.get_index_of(target).ok_or_else(|| {
                ConfigError::UnknownState {
                    state: state.to_string(),
                    index,
                    target: target.to_string(),
                }
            })?;
            Some(Transition::Push(StateId::from_usize(id)))
        },
    };

    Ok(Rule {
        pattern,
        source: def.pattern.clone(),
        category: def.category,
        consumes: def.consumes,
        transition,
        lookbehind,
    })
}
