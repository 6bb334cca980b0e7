//! Content-block document owned by a single tour package.
//!
//! A document is an ordered list of typed blocks. Position in the list is the
//! only ordering; reordering swaps list entries. Every operation addressed by
//! index treats an out-of-range index as a no-op, except insertion, which
//! clamps so the editor can always add a block.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The editable block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Header,
    Paragraph,
    Image,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Header => "header",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Image => "image",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "header" => Some(BlockKind::Header),
            "paragraph" => Some(BlockKind::Paragraph),
            "image" => Some(BlockKind::Image),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block payload, tagged by `type` in the stored JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockBody {
    Header {
        value: String,
    },
    Paragraph {
        value: String,
    },
    Image {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    /// A block type this build does not know. Kept in place, never rendered.
    #[serde(other)]
    Unsupported,
}

impl BlockBody {
    fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Header => BlockBody::Header {
                value: String::new(),
            },
            BlockKind::Paragraph => BlockBody::Paragraph {
                value: String::new(),
            },
            BlockKind::Image => BlockBody::Image {
                value: String::new(),
                caption: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    #[serde(flatten)]
    pub body: BlockBody,
}

impl ContentBlock {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            body: BlockBody::empty(kind),
        }
    }

    pub fn kind(&self) -> Option<BlockKind> {
        match self.body {
            BlockBody::Header { .. } => Some(BlockKind::Header),
            BlockBody::Paragraph { .. } => Some(BlockKind::Paragraph),
            BlockBody::Image { .. } => Some(BlockKind::Image),
            BlockBody::Unsupported => None,
        }
    }

    pub fn value(&self) -> &str {
        match &self.body {
            BlockBody::Header { value }
            | BlockBody::Paragraph { value }
            | BlockBody::Image { value, .. } => value,
            BlockBody::Unsupported => "",
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match &self.body {
            BlockBody::Image { caption, .. } => caption.as_deref(),
            _ => None,
        }
    }
}

/// Which block field an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockField {
    Value,
    Caption,
}

impl BlockField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "value" => Some(BlockField::Value),
            "caption" => Some(BlockField::Caption),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward index 0.
    Up,
    /// Toward the end.
    Down,
}

impl Direction {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Vec<ContentBlock>);

impl Document {
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self(blocks)
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ContentBlock> {
        self.0.get(index)
    }

    /// Insert an empty block so it ends up at `index`. Negative indices clamp
    /// to 0 and indices past the end clamp to an append. Returns the new id.
    pub fn insert_at(&mut self, index: i64, kind: BlockKind) -> String {
        let position = index.clamp(0, self.0.len() as i64) as usize;
        let block = ContentBlock::new(kind);
        let id = block.id.clone();
        self.0.insert(position, block);
        id
    }

    pub fn append(&mut self, kind: BlockKind) -> String {
        self.insert_at(self.0.len() as i64, kind)
    }

    /// Replace one field of the block at `index`. Returns whether anything
    /// changed; captions only exist on image blocks.
    pub fn update_field(&mut self, index: usize, field: BlockField, text: String) -> bool {
        let Some(block) = self.0.get_mut(index) else {
            return false;
        };
        match (&mut block.body, field) {
            (BlockBody::Header { value }, BlockField::Value)
            | (BlockBody::Paragraph { value }, BlockField::Value)
            | (BlockBody::Image { value, .. }, BlockField::Value) => {
                *value = text;
                true
            }
            (BlockBody::Image { caption, .. }, BlockField::Caption) => {
                *caption = Some(text).filter(|c| !c.is_empty());
                true
            }
            _ => false,
        }
    }

    /// Swap the block at `index` with its neighbour. No-op at the boundaries.
    pub fn move_block(&mut self, index: usize, direction: Direction) -> bool {
        if index >= self.0.len() {
            return false;
        }
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.0.len() => index + 1,
            _ => return false,
        };
        self.0.swap(index, target);
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Option<ContentBlock> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }
}
