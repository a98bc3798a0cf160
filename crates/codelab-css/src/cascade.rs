//! Class cascade per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).

use std::collections::HashMap;

use crate::parser::{Properties, StyleSheet, parse_declarations};

/// Class name to the merged declarations of every rule for that class.
pub type ClassRules = HashMap<String, Properties>;

impl StyleSheet {
    /// Collapse the sheet into one property map per class. When a class is
    /// declared more than once, later declarations win.
    #[must_use]
    pub fn class_rules(&self) -> ClassRules {
        let mut merged = ClassRules::new();
        for rule in &self.rules {
            merged
                .entry(rule.class.clone())
                .or_default()
                .extend(rule.properties.clone());
        }
        merged
    }

    /// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
    /// "The cascade takes an unordered list of declared values for a given property
    /// on a given element, sorts them by their declaration's precedence..."
    ///
    /// Effective properties of an element with the given `class` and `style`
    /// attributes. All class rules share one specificity, so rules apply in
    /// declaration order and the inline style applies last.
    #[must_use]
    pub fn resolve(&self, class_attr: Option<&str>, inline: Option<&str>) -> Properties {
        let mut properties = Properties::new();

        if let Some(class_attr) = class_attr {
            let classes: Vec<&str> = class_attr.split_ascii_whitespace().collect();
            if !classes.is_empty() {
                for rule in &self.rules {
                    if classes.contains(&rule.class.as_str()) {
                        properties.extend(
                            rule.properties
                                .iter()
                                .map(|(name, value)| (name.clone(), value.clone())),
                        );
                    }
                }
            }
        }

        // [§ 6.4 Style Attributes](https://www.w3.org/TR/css-cascade-4/#style-attr)
        if let Some(inline) = inline {
            properties.extend(parse_declarations(inline));
        }

        properties
    }
}
