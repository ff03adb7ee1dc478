use indexmap::IndexMap;

/// A literal value as it appears in rule text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    /// String literal, surrounding quotes included.
    Str(String),
    Bool(bool),
    /// The implicit "ANY" value of a bare datum: the attribute only has to
    /// exist.
    Wild,
}

/// Binary operators. Arithmetic yields numbers, comparisons yield booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Is,
    IsNot,
    Less,
    Greater,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Value),
    /// A bare name, resolved against the row under consideration (in match
    /// conditions) or the context (in consequences), falling back to its own
    /// text.
    Ref(String),
    /// An `alias.attr` reference into the context.
    Path { alias: String, attr: String },
    Bin {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Conjunction of two comparisons, produced by chained inequalities like
    /// `0 < x < 100`.
    And(Box<Expr>, Box<Expr>),
}

/// Per-attribute requirement inside a match clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The attribute merely has to exist.
    Any,
    /// The attribute exists and the expression evaluates to true.
    Cond(Expr),
}

/// Quantifier-like modifiers on a match clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjective {
    One,
    Only,
    Global,
}

/// Relations between a clause (or created object) and the rest of the
/// context. `friend` is the only relation the grammar knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Friend,
}

impl Relation {
    /// Attribute name the relation's back-references are stored under.
    pub fn attr_name(&self) -> &'static str {
        match self {
            Relation::Friend => "friend",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchClause {
    pub adjectives: Vec<Adjective>,
    pub relation: Option<Relation>,
    /// Ordered, non-empty. Matching compares tag sets for equality.
    pub tags: Vec<String>,
    pub attrs: IndexMap<String, Condition>,
    /// Names the matched object binds to. Pronouns (`me/my`) produce several
    /// names for one object; an unaliased clause is addressable by its tags.
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Consequence {
    /// Mint a fresh object carrying `tags` and the evaluated attributes.
    Create {
        relation: Option<Relation>,
        tags: Vec<String>,
        attrs: IndexMap<String, Expr>,
    },
    /// Merge the evaluated attributes into the object bound to `alias`.
    Update {
        alias: String,
        attrs: IndexMap<String, Expr>,
    },
}

/// One `when ... create/update ...` rule. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub premise: Vec<MatchClause>,
    pub consequents: Vec<Consequence>,
}
