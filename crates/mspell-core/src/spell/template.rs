//! Message templates
//!
//! Catalog messages name the caster and target with `$CASTER`,
//! `$CASTER_POS`, `$TARGET` and `$TARGET_POS`. They are split into typed
//! segments once, when the catalog is built, so a cast only concatenates.

/// A substitution slot in a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Var {
    Caster,
    /// Caster possessive ("his", "her", "its", "your")
    CasterPos,
    Target,
    TargetPos,
}

impl Var {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "CASTER" => Some(Var::Caster),
            "CASTER_POS" => Some(Var::CasterPos),
            "TARGET" => Some(Var::Target),
            "TARGET_POS" => Some(Var::TargetPos),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Var(Var),
}

/// Values substituted into a template
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageVars<'a> {
    pub caster: &'a str,
    pub caster_pos: &'a str,
    pub target: &'a str,
    pub target_pos: &'a str,
}

impl MessageVars<'_> {
    fn get(&self, var: Var) -> &str {
        match var {
            Var::Caster => self.caster,
            Var::CasterPos => self.caster_pos,
            Var::Target => self.target,
            Var::TargetPos => self.target_pos,
        }
    }
}

/// Marker rendered for an unrecognized `$NAME`
const UNKNOWN_VAR: &str = "<color:v>?</color>";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(src: &str) -> Self {
        let mut out = Self::new();
        let mut rest = src;
        while let Some(at) = rest.find('$') {
            out = out.text(&rest[..at]);
            let after = &rest[at + 1..];
            let len = after
                .find(|c: char| !(c.is_ascii_uppercase() || c == '_'))
                .unwrap_or(after.len());
            out = match Var::from_name(&after[..len]) {
                Some(var) => out.var(var),
                None => out.text(UNKNOWN_VAR),
            };
            rest = &after[len..];
        }
        out.text(rest)
    }

    /// Append literal text, merging with a preceding literal.
    pub fn text(mut self, text: &str) -> Self {
        if text.is_empty() {
            return self;
        }
        match self.segments.last_mut() {
            Some(Segment::Text(prev)) => prev.push_str(text),
            _ => self.segments.push(Segment::Text(text.to_string())),
        }
        self
    }

    pub fn var(mut self, var: Var) -> Self {
        self.segments.push(Segment::Var(var));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn render(&self, vars: &MessageVars<'_>) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Var(v) => out.push_str(vars.get(*v)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> MessageVars<'static> {
        MessageVars {
            caster: "The dark elven priest",
            caster_pos: "his",
            target: "the kobold",
            target_pos: "its",
        }
    }

    #[test]
    fn test_parse_segments() {
        let t = Template::parse("$CASTER concentrates on $CASTER_POS wounds.");
        assert_eq!(
            t.segments(),
            &[
                Segment::Var(Var::Caster),
                Segment::Text(" concentrates on ".into()),
                Segment::Var(Var::CasterPos),
                Segment::Text(" wounds.".into()),
            ]
        );
    }

    #[test]
    fn test_render() {
        let t = Template::parse("$CASTER points at $TARGET and curses.");
        assert_eq!(
            t.render(&vars()),
            "The dark elven priest points at the kobold and curses."
        );
    }

    #[test]
    fn test_unknown_var() {
        let t = Template::parse("$WHO sneezes.");
        assert_eq!(t.render(&vars()), "<color:v>?</color> sneezes.");
    }

    #[test]
    fn test_var_stops_at_lowercase() {
        let t = Template::parse("$CASTERs book");
        assert_eq!(t.render(&vars()), "The dark elven priests book");
    }

    #[test]
    fn test_empty() {
        assert!(Template::parse("").is_empty());
        assert!(!Template::parse("'Booooeeeeee'").is_empty());
    }

    #[test]
    fn test_builder_merges_text() {
        let t = Template::new().var(Var::Caster).text(" breathes ").text("fire.");
        assert_eq!(t.segments().len(), 2);
    }
}
