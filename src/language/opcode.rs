use crate::language::geometry::Mirror;

/// A decoded cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Nop,
    Terminate,

    Increment,
    Decrement,
    Add,
    Subtract,
    Multiply,
    Negate,
    Divide,
    Modulo,

    MoveLeft,
    MoveRight,
    Reverse,
    /// `"`: reverse, move right, reverse.
    BackLeft,
    /// `'`: reverse, move left, reverse.
    BackRight,
    MoveBySign,
    CopyBySign,

    ReadByte,
    WriteByte,
    ReadInteger,
    WriteInteger,

    Mirror(Mirror),
    NextIp,
    PreviousIp,
    SelectIp,
    Skip,

    Digit(u8),
    Literal(char),
}

impl Opcode {
    pub fn decode(ch: char) -> Opcode {
        if let Some(mirror) = Mirror::from_char(ch) {
            return Opcode::Mirror(mirror);
        }
        match ch {
            '.' | '\0' => Opcode::Nop,
            '@' => Opcode::Terminate,
            ')' => Opcode::Increment,
            '(' => Opcode::Decrement,
            '+' => Opcode::Add,
            '-' => Opcode::Subtract,
            '*' => Opcode::Multiply,
            '~' => Opcode::Negate,
            ':' => Opcode::Divide,
            '%' => Opcode::Modulo,
            '{' => Opcode::MoveLeft,
            '}' => Opcode::MoveRight,
            '=' => Opcode::Reverse,
            '"' => Opcode::BackLeft,
            '\'' => Opcode::BackRight,
            '^' => Opcode::MoveBySign,
            '&' => Opcode::CopyBySign,
            ',' => Opcode::ReadByte,
            ';' => Opcode::WriteByte,
            '?' => Opcode::ReadInteger,
            '!' => Opcode::WriteInteger,
            ']' => Opcode::NextIp,
            '[' => Opcode::PreviousIp,
            '#' => Opcode::SelectIp,
            '$' => Opcode::Skip,
            '0'..='9' => Opcode::Digit(ch as u8 - b'0'),
            other => Opcode::Literal(other),
        }
    }

    /// Opcodes that steer instruction pointers instead of touching memory or I/O.
    pub fn is_control(self) -> bool {
        matches!(
            self,
            Opcode::Mirror(_) | Opcode::NextIp | Opcode::PreviousIp | Opcode::SelectIp | Opcode::Skip
        )
    }
}
