//! Destination and group tracking.
//!
//! Every RTF group inherits the destination of its parent unless a
//! destination control word switches it. The tracker keeps one stack entry
//! per open group, so the stack depth is the group depth by construction.

/// Content category of the current RTF group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Destination {
    /// Body content
    #[default]
    Normal,
    FontTable,
    ColorTable,
    StyleSheet,
    /// Document information (`\info`)
    Info,
    /// Embedded picture (`\pict`)
    Picture,
    ListTable,
    ListOverrideTable,
    /// Known metadata destination with no content value
    IgnoredDestination,
    ShapeInst,
    ShapeProperty,
    /// Group marked with `\*` whose destination is not otherwise recognised
    UnknownDestination,
}

/// Destinations whose content is metadata noise.
const IGNORED_WORDS: &[&str] = &[
    "wgrffmtfilter",
    "generator",
    "company",
    "mmathPr",
    "rsidtbl",
    "themedata",
    "colorschememapping",
    "datastore",
    "latentstyles",
    "pgdsctbl",
    "revtbl",
    "filetbl",
    "xmlnstbl",
    "ftnsep",
    "ftnsepc",
    "ftncn",
    "aftnsep",
    "aftnsepc",
    "aftncn",
];

impl Destination {
    /// Destination switched to by a control word, if any.
    pub fn from_control_word(word: &str) -> Option<Self> {
        let destination = match word {
            "fonttbl" => Destination::FontTable,
            "colortbl" => Destination::ColorTable,
            "stylesheet" => Destination::StyleSheet,
            "info" => Destination::Info,
            "pict" => Destination::Picture,
            "listtable" => Destination::ListTable,
            "listoverridetable" => Destination::ListOverrideTable,
            "shpinst" => Destination::ShapeInst,
            "sp" => Destination::ShapeProperty,
            _ if IGNORED_WORDS.contains(&word) => Destination::IgnoredDestination,
            _ => return None,
        };
        Some(destination)
    }

    /// Whether tokens in this destination are hidden from the document builder.
    pub fn is_ignorable(&self) -> bool {
        !matches!(self, Destination::Normal | Destination::Picture)
    }
}

/// Result of closing a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupExit {
    /// Destination of the group that just closed
    pub left: Destination,
    /// Destination now current
    pub restored: Destination,
    /// Whether the `}` had no matching `{`
    pub unmatched: bool,
}

impl GroupExit {
    /// Whether this close ends a picture, so its data must be finalized.
    pub fn closes_picture(&self) -> bool {
        self.left == Destination::Picture && self.restored != Destination::Picture
    }
}

/// Stack-based destination tracker.
#[derive(Debug, Default)]
pub struct DestinationTracker {
    current: Destination,
    stack: Vec<Destination>,
    pushes: usize,
    pops: usize,
    unmatched: usize,
    max_depth: usize,
}

impl DestinationTracker {
    /// Create a tracker at depth 0 in the body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current destination.
    pub fn current(&self) -> Destination {
        self.current
    }

    /// Current group depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether content in the current destination is dropped.
    pub fn should_ignore(&self) -> bool {
        self.current.is_ignorable()
    }

    /// Feed a control word; returns true if it switched the destination.
    pub fn on_control_word(&mut self, word: &str) -> bool {
        match Destination::from_control_word(word) {
            Some(destination) => {
                self.current = destination;
                true
            }
            None => false,
        }
    }

    /// Handle `\*`.
    pub fn mark_ignorable(&mut self) {
        self.current = Destination::UnknownDestination;
    }

    /// Handle `{`.
    pub fn group_start(&mut self) {
        self.stack.push(self.current);
        self.pushes += 1;
        self.max_depth = self.max_depth.max(self.stack.len());
    }

    /// Handle `}`.
    pub fn group_end(&mut self) -> GroupExit {
        let left = self.current;
        match self.stack.pop() {
            Some(destination) => {
                self.pops += 1;
                self.current = destination;
                GroupExit {
                    left,
                    restored: destination,
                    unmatched: false,
                }
            }
            None => {
                self.unmatched += 1;
                self.current = Destination::Normal;
                GroupExit {
                    left,
                    restored: Destination::Normal,
                    unmatched: true,
                }
            }
        }
    }

    /// Unwind groups left open at end of input; returns how many were open.
    pub fn finish(&mut self) -> usize {
        let open = self.stack.len();
        if open > 0 {
            log::warn!("{} group(s) left open at end of input", open);
        }
        self.pops += open;
        self.stack.clear();
        self.current = Destination::Normal;
        open
    }

    /// Number of `{` seen.
    pub fn pushes(&self) -> usize {
        self.pushes
    }

    /// Number of groups closed, including unwound ones.
    pub fn pops(&self) -> usize {
        self.pops
    }

    /// Number of `}` with nothing to close.
    pub fn unmatched_closes(&self) -> usize {
        self.unmatched
    }

    /// Deepest nesting reached.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
