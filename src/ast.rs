use crate::token::Token;
use crate::value::Value;

/// Expression nodes. Every node owns its children; operator and name tokens
/// are kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Value,
    },
    Grouping {
        expr: Box<Expr>,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Variable {
        name: Token,
    },
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        paren: Token,
        arguments: Vec<Expr>,
    },
    Get {
        object: Box<Expr>,
        name: Token,
    },
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },
    SelfRef {
        keyword: Token,
    },
    Super {
        keyword: Token,
        method: Token,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression { expr: Expr },
    Print { keyword: Token, expr: Expr },
}

/// One operation per expression kind.
///
/// None of the methods have a default body: a new `Expr` variant does not
/// compile until every visitor handles it.
pub trait ExprVisitor<R> {
    fn visit_literal(&mut self, value: &Value) -> R;
    fn visit_grouping(&mut self, expr: &Expr) -> R;
    fn visit_unary(&mut self, operator: &Token, right: &Expr) -> R;
    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> R;
    fn visit_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> R;
    fn visit_variable(&mut self, name: &Token) -> R;
    fn visit_assign(&mut self, name: &Token, value: &Expr) -> R;
    fn visit_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> R;
    fn visit_get(&mut self, object: &Expr, name: &Token) -> R;
    fn visit_set(&mut self, object: &Expr, name: &Token, value: &Expr) -> R;
    fn visit_self(&mut self, keyword: &Token) -> R;
    fn visit_super(&mut self, keyword: &Token, method: &Token) -> R;
}

pub trait StmtVisitor<R> {
    fn visit_expression_stmt(&mut self, expr: &Expr) -> R;
    fn visit_print_stmt(&mut self, keyword: &Token, expr: &Expr) -> R;
}

impl Expr {
    pub fn accept<R, V: ExprVisitor<R> + ?Sized>(&self, visitor: &mut V) -> R {
        match self {
            Expr::Literal { value } => visitor.visit_literal(value),
            Expr::Grouping { expr } => visitor.visit_grouping(expr),
            Expr::Unary { operator, right } => visitor.visit_unary(operator, right),
            Expr::Binary {
                left,
                operator,
                right,
            } => visitor.visit_binary(left, operator, right),
            Expr::Logical {
                left,
                operator,
                right,
            } => visitor.visit_logical(left, operator, right),
            Expr::Variable { name } => visitor.visit_variable(name),
            Expr::Assign { name, value } => visitor.visit_assign(name, value),
            Expr::Call {
                callee,
                paren,
                arguments,
            } => visitor.visit_call(callee, paren, arguments),
            Expr::Get { object, name } => visitor.visit_get(object, name),
            Expr::Set {
                object,
                name,
                value,
            } => visitor.visit_set(object, name, value),
            Expr::SelfRef { keyword } => visitor.visit_self(keyword),
            Expr::Super { keyword, method } => visitor.visit_super(keyword, method),
        }
    }

    pub fn literal(value: Value) -> Self {
        Expr::Literal { value }
    }

    pub fn grouping(expr: Expr) -> Self {
        Expr::Grouping {
            expr: Box::new(expr),
        }
    }

    pub fn unary(operator: Token, right: Expr) -> Self {
        Expr::Unary {
            operator,
            right: Box::new(right),
        }
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn logical(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Logical {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

impl Stmt {
    pub fn accept<R, V: StmtVisitor<R> + ?Sized>(&self, visitor: &mut V) -> R {
        match self {
            Stmt::Expression { expr } => visitor.visit_expression_stmt(expr),
            Stmt::Print { keyword, expr } => visitor.visit_print_stmt(keyword, expr),
        }
    }

    pub fn expr(&self) -> &Expr {
        match self {
            Stmt::Expression { expr } | Stmt::Print { expr, .. } => expr,
        }
    }
}
