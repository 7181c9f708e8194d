/// Rename arrow separating the old and new attribute names (`a➡b`).
pub const ARROW: char = '➡';

/// Word spelling of the semijoin operator, accepted wherever `⋉` is.
pub const SEMIJOIN_KEYWORD: &str = "semijoin";

/// Unary operators. Each carries a parameter string and one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Projection (`π`), parameter is a comma-separated attribute list
    Projection,
    /// Selection (`σ`), parameter is an opaque predicate
    Selection,
    /// Rename (`ρ`), parameter is a comma-separated list of `old➡new` pairs
    Rename,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 3] = [UnaryOp::Projection, UnaryOp::Selection, UnaryOp::Rename];

    pub fn symbol(self) -> char {
        match self {
            UnaryOp::Projection => 'π',
            UnaryOp::Selection => 'σ',
            UnaryOp::Rename => 'ρ',
        }
    }

    pub fn from_symbol(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == ch)
    }

    /// Name of the relation operation this operator is evaluated with.
    pub fn operation_name(self) -> &'static str {
        match self {
            UnaryOp::Projection => "projection",
            UnaryOp::Selection => "selection",
            UnaryOp::Rename => "rename",
        }
    }
}

/// Binary operators. All of them bind looser than any unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Cartesian product (`*`)
    Product,
    /// Difference (`-`)
    Difference,
    /// Union (`∪`)
    Union,
    /// Intersection (`∩`)
    Intersection,
    /// Division (`÷`)
    Division,
    /// Natural join (`⋈`)
    Join,
    /// Left outer join (`⧑`)
    JoinLeft,
    /// Right outer join (`⧒`)
    JoinRight,
    /// Full outer join (`⧓`)
    JoinFull,
    /// Semijoin (`⋉` or `semijoin`)
    Semijoin,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 10] = [
        BinaryOp::Product,
        BinaryOp::Difference,
        BinaryOp::Union,
        BinaryOp::Intersection,
        BinaryOp::Division,
        BinaryOp::Join,
        BinaryOp::JoinLeft,
        BinaryOp::JoinRight,
        BinaryOp::JoinFull,
        BinaryOp::Semijoin,
    ];

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Product => '*',
            BinaryOp::Difference => '-',
            BinaryOp::Union => '∪',
            BinaryOp::Intersection => '∩',
            BinaryOp::Division => '÷',
            BinaryOp::Join => '⋈',
            BinaryOp::JoinLeft => '⧑',
            BinaryOp::JoinRight => '⧒',
            BinaryOp::JoinFull => '⧓',
            BinaryOp::Semijoin => '⋉',
        }
    }

    pub fn from_symbol(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == ch)
    }

    /// Recognizes operators spelled as words. Only `semijoin` has one.
    pub fn from_keyword(word: &str) -> Option<Self> {
        (word == SEMIJOIN_KEYWORD).then_some(BinaryOp::Semijoin)
    }

    /// Name of the relation operation this operator is evaluated with.
    pub fn operation_name(self) -> &'static str {
        match self {
            BinaryOp::Product => "product",
            BinaryOp::Difference => "difference",
            BinaryOp::Union => "union",
            BinaryOp::Intersection => "intersection",
            BinaryOp::Division => "division",
            BinaryOp::Join => "join",
            BinaryOp::JoinLeft => "outer_left",
            BinaryOp::JoinRight => "outer_right",
            BinaryOp::JoinFull => "outer",
            BinaryOp::Semijoin => "semijoin",
        }
    }

    /// Set operators a selection distributes over.
    pub fn is_set_operation(self) -> bool {
        matches!(
            self,
            BinaryOp::Union | BinaryOp::Difference | BinaryOp::Intersection
        )
    }

    /// Join-class operators whose schema is the union of both operands.
    pub fn is_join(self) -> bool {
        matches!(
            self,
            BinaryOp::Join
                | BinaryOp::JoinLeft
                | BinaryOp::JoinRight
                | BinaryOp::JoinFull
                | BinaryOp::Semijoin
        )
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[test]
fn test_operation_table() {
    assert_eq!(BinaryOp::JoinLeft.operation_name(), "outer_left");
    assert_eq!(BinaryOp::JoinRight.operation_name(), "outer_right");
    assert_eq!(BinaryOp::JoinFull.operation_name(), "outer");
    assert_eq!(UnaryOp::Rename.operation_name(), "rename");
}

#[test]
fn test_symbols_round_trip() {
    for op in BinaryOp::ALL {
        assert_eq!(BinaryOp::from_symbol(op.symbol()), Some(op));
    }
    for op in UnaryOp::ALL {
        assert_eq!(UnaryOp::from_symbol(op.symbol()), Some(op));
    }
    assert_eq!(BinaryOp::from_keyword("semijoin"), Some(BinaryOp::Semijoin));
    assert_eq!(BinaryOp::from_keyword("join"), None);
}
