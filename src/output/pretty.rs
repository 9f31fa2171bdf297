use crate::dom::{Dom, Node};
use crate::xmlvalue::Value;

use super::serializer::Output;

// we need to track where we are in xml:space, so that we can know when to
// insert newlines and indentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    Empty,
    Default,
    Preserve,
}

// The stack keeps track of where we are, and the xml space state. We are
// either in a mixed element (with text and subcontent) (in which case we don't
// do any indentation anymore, including for its descendants), or in an element
// without text, in which case we can potentially indent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry {
    Unmixed(Space),
    Mixed,
}

/// Decides indentation and newlines around output tokens.
pub(crate) struct Pretty<'a> {
    dom: &'a Dom,
    stack: Vec<StackEntry>,
}

impl<'a> Pretty<'a> {
    pub(crate) fn new(dom: &'a Dom) -> Self {
        Pretty {
            dom,
            stack: Vec::new(),
        }
    }

    fn in_mixed(&self) -> bool {
        self.stack.iter().any(|e| *e == StackEntry::Mixed)
    }

    fn in_space_preserve(&self) -> bool {
        for entry in self.stack.iter().rev() {
            match entry {
                StackEntry::Unmixed(Space::Preserve) => return true,
                StackEntry::Unmixed(Space::Default) | StackEntry::Mixed => return false,
                StackEntry::Unmixed(Space::Empty) => (),
            }
        }
        false
    }

    fn get_indentation(&self) -> usize {
        if self.in_mixed() {
            return 0;
        }
        let mut count = 0;
        let mut in_preserve = false;
        for entry in self.stack.iter() {
            match entry {
                StackEntry::Unmixed(Space::Default) => {
                    in_preserve = false;
                    count += 1
                }
                StackEntry::Unmixed(Space::Preserve) => in_preserve = true,
                StackEntry::Unmixed(Space::Empty) => {
                    if !in_preserve {
                        count += 1
                    }
                }
                StackEntry::Mixed => (),
            }
        }
        if in_preserve {
            0
        } else {
            count
        }
    }

    fn get_newline(&self) -> bool {
        !self.in_mixed() && !self.in_space_preserve()
    }

    fn has_text_child(&self, node: Node) -> bool {
        self.dom
            .children(node)
            .any(|child| matches!(self.dom.value(child), Value::Text(_)))
    }

    fn element_space(&self, node: Node) -> Space {
        let space = self
            .dom
            .element(node)
            .and_then(|element| element.get_attribute(self.dom.xml_space_name()));
        match space {
            Some("preserve") => Space::Preserve,
            Some("default") => Space::Default,
            _ => Space::Empty,
        }
    }

    /// Indentation level before the token, and whether a newline follows it.
    pub(crate) fn prettify(&mut self, node: Node, output: &Output) -> (usize, bool) {
        use Output::*;
        match output {
            StartTagOpen(_) | Comment(_) | ProcessingInstruction(..) => {
                let newline = !matches!(output, StartTagOpen(_)) && self.get_newline();
                (self.get_indentation(), newline)
            }
            StartTagClose => {
                if self.dom.first_child(node).is_none() {
                    return (0, false);
                }
                if self.has_text_child(node) {
                    self.stack.push(StackEntry::Mixed);
                    (0, false)
                } else {
                    let space = self.element_space(node);
                    self.stack.push(StackEntry::Unmixed(space));
                    (0, self.get_newline())
                }
            }
            EndTag(_) => {
                let indentation = if self.dom.first_child(node).is_some() {
                    let no_indentation = self.in_mixed() || self.in_space_preserve();
                    self.stack.pop();
                    if no_indentation {
                        0
                    } else {
                        self.get_indentation()
                    }
                } else {
                    0
                };
                (indentation, self.get_newline())
            }
            Attribute(_) | Text(_) => (0, false),
        }
    }
}
