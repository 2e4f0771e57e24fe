//! Tree node representation for hypertext and SVG markup.

use std::convert::Infallible;

/// Element node in a parsed markup tree.
///
/// Attributes keep their source order so that untouched elements serialize
/// back to the same text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    /// Element tag name (may include a namespace prefix).
    pub tag: String,
    /// Text before the first child.
    pub text: String,
    /// Text after this element, inside the parent.
    pub tail: String,
    /// Element attributes in source order.
    pub attrs: Vec<(String, String)>,
    /// Child elements.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new tree node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Set (or overwrite) one attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Tag name without any namespace prefix (`svg:text` -> `text`).
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.tag.rsplit(':').next().unwrap_or(&self.tag)
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Check whether the whitespace-separated `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// All character data inside this element, in document order.
    ///
    /// The element's own tail is not part of its content.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut pieces = Vec::new();
        self.collect_text(&mut pieces);
        pieces.concat()
    }

    /// Character data with each piece trimmed, empty pieces dropped, and the
    /// rest joined by single spaces.
    #[must_use]
    pub fn stripped_text(&self) -> String {
        let mut pieces = Vec::new();
        self.collect_text(&mut pieces);
        pieces
            .iter()
            .map(|piece| piece.trim())
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.text);
        for child in &self.children {
            child.collect_text(out);
            out.push(&child.tail);
        }
    }

    /// Replace all content of this element with a single text run.
    pub fn set_text_content(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.text = text.into();
    }

    /// First descendant (depth-first, document order) matching `pred`.
    #[must_use]
    pub fn find<P>(&self, pred: &P) -> Option<&TreeNode>
    where
        P: Fn(&TreeNode) -> bool,
    {
        for child in &self.children {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find(pred) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants in depth-first document order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }

    /// Whether any text run inside this element satisfies `pred`.
    #[must_use]
    pub fn contains_text<P>(&self, pred: &P) -> bool
    where
        P: Fn(&str) -> bool,
    {
        pred(&self.text)
            || self
                .children
                .iter()
                .any(|child| child.contains_text(pred) || pred(&child.tail))
    }

    /// First text run inside this element (document order) satisfying `pred`.
    pub fn find_text_mut<P>(&mut self, pred: &P) -> Option<&mut String>
    where
        P: Fn(&str) -> bool,
    {
        if pred(&self.text) {
            return Some(&mut self.text);
        }
        for child in &mut self.children {
            if child.contains_text(pred) {
                return child.find_text_mut(pred);
            }
            if pred(&child.tail) {
                return Some(&mut child.tail);
            }
        }
        None
    }

    /// Replace descendants matching `pred`.
    ///
    /// `replace` receives each matching node and returns `Some(new)` to swap
    /// it out, or `None` to keep it (possibly modified in place). A
    /// replacement inherits the old node's tail, so sibling text stays put.
    /// The subtree that ends up in the slot is searched afterwards, which
    /// lets nested matches be handled too.
    ///
    /// Returns the number of nodes replaced.
    pub fn replace_descendants<P, F>(&mut self, pred: &P, replace: &mut F) -> usize
    where
        P: Fn(&TreeNode) -> bool,
        F: FnMut(&mut TreeNode) -> Option<TreeNode>,
    {
        let result = self.try_replace_descendants(pred, &mut |node: &mut TreeNode| {
            Ok::<_, Infallible>(replace(node))
        });
        match result {
            Ok(count) => count,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`replace_descendants`](Self::replace_descendants).
    ///
    /// The first error aborts the walk; replacements made so far are kept.
    pub fn try_replace_descendants<P, F, E>(&mut self, pred: &P, replace: &mut F) -> Result<usize, E>
    where
        P: Fn(&TreeNode) -> bool,
        F: FnMut(&mut TreeNode) -> Result<Option<TreeNode>, E>,
    {
        let mut count = 0;
        for child in &mut self.children {
            if pred(&*child)
                && let Some(mut replacement) = replace(child)?
            {
                replacement.tail = std::mem::take(&mut child.tail);
                *child = replacement;
                count += 1;
            }
            count += child.try_replace_descendants(pred, replace)?;
        }
        Ok(count)
    }
}
