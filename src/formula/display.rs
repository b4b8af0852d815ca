use super::node::{Formula, Kind};

use core::fmt;

// Pending output of the renderer: a sub-formula still to expand, or literal text.
enum Piece<'a> {
    Formula(&'a Formula),
    Text(&'static str),
    Exponent(i32),
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pieces are pushed in reverse order of output
        let mut stack = vec![Piece::Formula(self)];
        while let Some(piece) = stack.pop() {
            let node = match piece {
                Piece::Formula(node) => node,
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Exponent(m) => {
                    write!(f, ",{m})")?;
                    continue;
                }
            };

            let c = node.children();
            let (open, sep, close) = match node.kind() {
                Kind::Zero(1) => {
                    f.write_str("0")?;
                    continue;
                }
                Kind::Zero(dim) => {
                    write!(f, "0({dim})")?;
                    continue;
                }
                Kind::IntConstant(n) => {
                    write!(f, "{n}")?;
                    continue;
                }
                Kind::Variable(v) => {
                    write!(f, "x{}", v.index())?;
                    continue;
                }
                Kind::Add => ("(", " + ", ")"),
                Kind::Scal => ("(", " * ", ")"),
                Kind::Scalprod => ("<", "|", ">"),
                Kind::Exp => ("Exp(", "", ")"),
                Kind::Log => ("Log(", "", ")"),
                Kind::Pow(m) => {
                    f.write_str("Pow(")?;
                    stack.push(Piece::Exponent(*m));
                    stack.push(Piece::Formula(&c[0]));
                    continue;
                }
            };

            f.write_str(open)?;
            stack.push(Piece::Text(close));
            match c {
                [a, b] => {
                    stack.push(Piece::Formula(b));
                    stack.push(Piece::Text(sep));
                    stack.push(Piece::Formula(a));
                }
                [a] => stack.push(Piece::Formula(a)),
                _ => {}
            }
        }
        Ok(())
    }
}
