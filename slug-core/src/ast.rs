use std::fmt::Display;
use std::ops::Index;
use std::rc::Rc;

/// Index of a node inside its [`Program`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    Identifier(Rc<str>),
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    /// `let` and `const`.
    Declaration {
        name: Rc<str>,
        value: NodeId,
        constant: bool,
    },
    Assignment {
        name: Rc<str>,
        value: NodeId,
    },
    Binary {
        operator: BinaryOperator,
        left: NodeId,
        right: NodeId,
    },
    Unary {
        operator: UnaryOperator,
        operand: NodeId,
    },
    /// Two chained statements; `rest` is itself a sequence for longer runs.
    Sequence {
        first: NodeId,
        rest: NodeId,
    },
    Block(Option<NodeId>),
    If {
        branches: Vec<Branch>,
        otherwise: Option<NodeId>,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    FunctionLiteral(FunctionLiteral),
    Call {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    BuiltinCall {
        builtin: Builtin,
        arguments: Vec<NodeId>,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub struct Branch {
    pub condition: NodeId,
    pub body: NodeId,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionLiteral {
    pub parameters: Rc<[Rc<str>]>,
    /// Either a [`Node::Block`] or a bare expression.
    pub body: NodeId,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Or,
    And,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Negate,
    Not,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Builtin {
    Outn,
}

/// A parsed program: every node lives in one arena and refers to its
/// children by [`NodeId`]. Nodes are never mutated once the parser hands the
/// program over.
#[derive(Debug, Default, PartialEq)]
pub struct Program {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Program {
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    /// `None` for a program without statements.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn display(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay { program: self, id }
    }
}

impl Index<NodeId> for Program {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.root {
            Some(root) => write!(f, "{}", self.display(root)),
            None => Ok(()),
        }
    }
}

pub struct NodeDisplay<'a> {
    program: &'a Program,
    id: NodeId,
}

impl NodeDisplay<'_> {
    fn child(&self, id: NodeId) -> Self {
        NodeDisplay {
            program: self.program,
            id,
        }
    }

    fn list(&self, ids: &[NodeId]) -> String {
        ids.iter()
            .map(|id| self.child(*id).to_string())
            .collect::<Vec<String>>()
            .join(", ")
    }
}

impl Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Node::*;
        match &self.program[self.id] {
            Identifier(name) => write!(f, "{}", name),
            IntegerLiteral(value) => write!(f, "{}", value),
            BooleanLiteral(value) => write!(f, "{}", value),
            Declaration {
                name,
                value,
                constant,
            } => {
                let keyword = if *constant { "const" } else { "let" };
                write!(f, "{} {} = {}", keyword, name, self.child(*value))
            }
            Assignment { name, value } => write!(f, "{} = {}", name, self.child(*value)),
            Binary {
                operator,
                left,
                right,
            } => write!(
                f,
                "({} {} {})",
                self.child(*left),
                operator.to_str(),
                self.child(*right)
            ),
            Unary { operator, operand } => {
                write!(f, "({}{})", operator.to_str(), self.child(*operand))
            }
            Sequence { first, rest } => {
                write!(f, "{}; {}", self.child(*first), self.child(*rest))
            }
            Block(None) => write!(f, "{{}}"),
            Block(Some(inner)) => write!(f, "{{ {} }}", self.child(*inner)),
            If {
                branches,
                otherwise,
            } => {
                for (i, branch) in branches.iter().enumerate() {
                    let keyword = if i == 0 { "if" } else { " elif" };
                    write!(
                        f,
                        "{} ({}) {}",
                        keyword,
                        self.child(branch.condition),
                        self.child(branch.body)
                    )?;
                }
                if let Some(otherwise) = otherwise {
                    write!(f, " else {}", self.child(*otherwise))?;
                }
                Ok(())
            }
            While { condition, body } => write!(
                f,
                "while ({}) {}",
                self.child(*condition),
                self.child(*body)
            ),
            FunctionLiteral(function) => write!(
                f,
                "func({}) => {}",
                function.parameters.join(", "),
                self.child(function.body)
            ),
            Call { callee, arguments } => {
                write!(f, "{}({})", self.child(*callee), self.list(arguments))
            }
            BuiltinCall { builtin, arguments } => {
                write!(f, "{}({})", builtin.name(), self.list(arguments))
            }
        }
    }
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        use BinaryOperator::*;
        match self {
            Or => 1,
            And => 2,
            Equal | NotEqual => 3,
            LessThan | LessEqual | GreaterThan | GreaterEqual => 4,
            Plus | Minus => 5,
            Multiply | Divide | Modulo => 6,
        }
    }

    pub fn to_str(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Or => "||",
            And => "&&",
            Equal => "==",
            NotEqual => "!=",
            LessThan => "<",
            LessEqual => "<=",
            GreaterThan => ">",
            GreaterEqual => ">=",
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
        }
    }
}

impl UnaryOperator {
    pub fn to_str(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
        }
    }
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Outn => "outn",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Builtin::Outn => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_index_the_arena() {
        let mut program = Program::default();
        let ids: Vec<NodeId> = (0..300)
            .map(|value| program.push(Node::IntegerLiteral(value)))
            .collect();

        for (position, id) in ids.into_iter().enumerate() {
            assert_eq!(id.index(), position);
            assert_eq!(program[id], Node::IntegerLiteral(position as i64));
        }
        assert_eq!(program.len(), 300);
    }

    #[test]
    fn test_programs_compare_structurally() {
        let mut first = Program::default();
        let root = first.push(Node::BooleanLiteral(true));
        first.set_root(Some(root));

        let mut second = Program::default();
        let root = second.push(Node::BooleanLiteral(true));
        second.set_root(Some(root));

        assert_eq!(first, second);
        assert_ne!(first, Program::default());
    }
}
