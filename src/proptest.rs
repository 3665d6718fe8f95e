//! Test strategies for ropes

use super::Rope;
use ::proptest::prelude::*;
use prop::strategy::ValueTree;

/// Value tree for `Rope<char>`.
///
/// Shrinks both the content and the tree shape: the generated string is
/// split at two cut points into three leaves, and the cuts shrink toward
/// zero along with the string.
pub struct RopeValueTree {
    cur_cut_start: usize,
    max_cut_start: usize,
    cur_cut_end: usize,
    max_cut_end: usize,
    tree: prop::string::RegexGeneratorValueTree<String>,
}

impl ValueTree for RopeValueTree {
    type Value = Rope<char>;

    fn current(&self) -> Self::Value {
        let chars: Vec<char> = self.tree.current().chars().collect();
        let cut_end = std::cmp::min(self.cur_cut_end, chars.len());
        let cut_start = std::cmp::min(self.cur_cut_start, cut_end);

        let mut rope = Rope::from(chars[..cut_start].to_vec());
        rope.append(chars[cut_start..cut_end].to_vec());
        rope.append(chars[cut_end..].to_vec());
        rope
    }

    fn simplify(&mut self) -> bool {
        if self.tree.simplify() {
            self.max_cut_start = self.cur_cut_start;
            self.cur_cut_start /= 2;
            self.max_cut_end = self.cur_cut_end;
            self.cur_cut_end /= 2;
            true
        } else {
            false
        }
    }

    fn complicate(&mut self) -> bool {
        if self.tree.complicate() {
            self.cur_cut_start += (self.max_cut_start - self.cur_cut_start) / 2;
            self.cur_cut_end += (self.max_cut_end - self.cur_cut_end) / 2;
            true
        } else {
            false
        }
    }
}

/// Provides default parameters for `Rope<char>`'s `Arbitrary` instance.
///
/// Arbitrary ropes range up to 128 characters, enough for trees of several
/// leaves once the cut points are applied.
#[derive(Debug)]
pub struct RopeParam(prop::string::RegexGeneratorStrategy<String>);

impl Default for RopeParam {
    fn default() -> Self {
        RopeParam(prop::string::string_regex(".{0,128}").unwrap())
    }
}

#[derive(Debug)]
/// Proptest strategy for generating ropes
pub struct RopeStrategy(pub(crate) RopeParam);

impl Strategy for RopeStrategy {
    type Tree = RopeValueTree;
    type Value = Rope<char>;

    fn new_tree(
        &self,
        runner: &mut ::proptest::test_runner::TestRunner,
    ) -> ::proptest::strategy::NewTree<Self> {
        let tree = self.0 .0.new_tree(runner)?;
        let len = tree.current().chars().count();
        let cut_end = runner.rng().gen_range(0usize..=len);
        let cut_start = runner.rng().gen_range(0usize..=cut_end);
        Ok(RopeValueTree {
            cur_cut_start: cut_start,
            max_cut_start: cut_start,
            cur_cut_end: cut_end,
            max_cut_end: cut_end,
            tree,
        })
    }
}

/// Returns a strategy for generating ropes whose contents match `regex`.
///
/// # Panics
///
/// Panics if the regex is invalid.
#[must_use]
pub fn rope(regex: &str) -> RopeStrategy {
    RopeStrategy(RopeParam(prop::string::string_regex(regex).unwrap()))
}
