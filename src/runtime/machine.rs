use crate::language::opcode::Opcode;
use crate::runtime::io::{InputReader, OutputSink, OutputValidator};
use crate::runtime::memory::Memory;
use std::io::Read;

/// Whether execution may continue after an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Memory plus I/O: everything an instruction touches except the instruction
/// pointers. Shared by the grid interpreter and scaffold replay.
#[derive(Clone, Debug)]
pub struct Machine<R, S> {
    pub memory: Memory,
    pub input: InputReader<R>,
    pub output: OutputValidator<S>,
}

impl<R: Read, S: OutputSink> Machine<R, S> {
    pub fn new(input: R, sink: S) -> Self {
        Self {
            memory: Memory::new(),
            input: InputReader::new(input),
            output: OutputValidator::new(sink),
        }
    }

    pub fn is_positive(&self) -> bool {
        self.memory.is_positive()
    }

    pub fn terminate(&mut self) -> Flow {
        self.output.finish();
        Flow::Halt
    }

    /// Runs one memory or I/O instruction. Control-flow opcodes are left to
    /// the caller and do nothing here.
    pub fn execute(&mut self, opcode: Opcode) -> Flow {
        let memory = &mut self.memory;
        match opcode {
            Opcode::Terminate => return self.terminate(),

            Opcode::Increment => memory.set(memory.get().wrapping_add(1)),
            Opcode::Decrement => memory.set(memory.get().wrapping_sub(1)),
            Opcode::Add => memory.set(memory.get_left().wrapping_add(memory.get_right())),
            Opcode::Subtract => memory.set(memory.get_left().wrapping_sub(memory.get_right())),
            Opcode::Multiply => memory.set(memory.get_left().wrapping_mul(memory.get_right())),
            Opcode::Negate => memory.set(memory.get().wrapping_neg()),
            Opcode::Divide | Opcode::Modulo => {
                let Some((quotient, remainder)) = floor_div_rem(memory.get_left(), memory.get_right())
                else {
                    return self.terminate();
                };
                memory.set(if opcode == Opcode::Divide {
                    quotient
                } else {
                    remainder
                });
            }

            Opcode::MoveLeft => memory.move_left(),
            Opcode::MoveRight => memory.move_right(),
            Opcode::Reverse => memory.reverse(),
            Opcode::BackLeft => {
                memory.reverse();
                memory.move_right();
                memory.reverse();
            }
            Opcode::BackRight => {
                memory.reverse();
                memory.move_left();
                memory.reverse();
            }
            Opcode::MoveBySign => {
                if memory.is_positive() {
                    memory.move_right();
                } else {
                    memory.move_left();
                }
            }
            Opcode::CopyBySign => {
                let value = if memory.is_positive() {
                    memory.get_right()
                } else {
                    memory.get_left()
                };
                memory.set(value);
            }

            Opcode::ReadByte => {
                let byte = self.input.read_byte();
                self.memory.set(byte);
            }
            Opcode::ReadInteger => {
                let value = self.input.read_integer();
                self.memory.set(value);
            }
            Opcode::WriteByte => {
                let byte = memory.get().rem_euclid(256) as u8;
                self.output.append(char::from(byte));
                if !self.output.success() {
                    return Flow::Halt;
                }
            }
            Opcode::WriteInteger => {
                let value = memory.get();
                self.output.append_integer(value);
                if !self.output.success() {
                    return Flow::Halt;
                }
            }

            Opcode::Digit(digit) => {
                let current = memory.get();
                let digit = i64::from(digit);
                let digit = if current < 0 { -digit } else { digit };
                memory.set(current.wrapping_mul(10).wrapping_add(digit));
            }
            Opcode::Literal(ch) => memory.set(i64::from(u32::from(ch))),

            Opcode::Nop
            | Opcode::Mirror(_)
            | Opcode::NextIp
            | Opcode::PreviousIp
            | Opcode::SelectIp
            | Opcode::Skip => {}
        }
        Flow::Continue
    }
}

/// Floored division and modulo: a non-zero remainder takes the sign of the
/// divisor. `None` for a zero divisor.
pub fn floor_div_rem(dividend: i64, divisor: i64) -> Option<(i64, i64)> {
    if divisor == 0 {
        return None;
    }
    let mut quotient = dividend.wrapping_div(divisor);
    let mut remainder = dividend.wrapping_rem(divisor);
    if remainder != 0 && ((dividend < 0) ^ (divisor < 0)) {
        remainder += divisor;
        quotient -= 1;
    }
    Some((quotient, remainder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::io::StringSink;
    use std::io::{empty, Empty};

    fn machine() -> Machine<Empty, StringSink> {
        Machine::new(empty(), StringSink::new())
    }

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        assert_eq!(floor_div_rem(7, 2), Some((3, 1)));
        assert_eq!(floor_div_rem(-7, 2), Some((-4, 1)));
        assert_eq!(floor_div_rem(7, -2), Some((-4, -1)));
        assert_eq!(floor_div_rem(-7, -2), Some((3, -1)));
        assert_eq!(floor_div_rem(-6, 2), Some((-3, 0)));
        assert_eq!(floor_div_rem(5, 0), None);
    }

    #[test]
    fn floor_division_identities_hold() {
        for dividend in -40..=40 {
            for divisor in (-9..=9).filter(|d| *d != 0) {
                let (q, r) = floor_div_rem(dividend, divisor).unwrap();
                assert_eq!(q * divisor + r, dividend);
                assert!(r.abs() < divisor.abs());
                if r != 0 {
                    assert_eq!(r.signum(), divisor.signum(), "{dividend} / {divisor}");
                }
            }
        }
    }

    #[test]
    fn digits_extend_with_sign() {
        let mut m = machine();
        m.execute(Opcode::Digit(4));
        m.execute(Opcode::Digit(2));
        assert_eq!(m.memory.get(), 42);
        m.execute(Opcode::Negate);
        m.execute(Opcode::Digit(5));
        assert_eq!(m.memory.get(), -425);
    }

    #[test]
    fn binary_ops_read_neighbours() {
        let mut m = machine();
        m.execute(Opcode::MoveLeft);
        m.execute(Opcode::Digit(7));
        m.execute(Opcode::BackLeft);
        m.execute(Opcode::MoveRight);
        m.execute(Opcode::Digit(3));
        m.execute(Opcode::BackRight);
        assert_eq!((m.memory.get_left(), m.memory.get_right()), (7, 3));

        m.execute(Opcode::Multiply);
        assert_eq!(m.memory.get(), 21);
        m.execute(Opcode::Subtract);
        assert_eq!(m.memory.get(), 4);
        m.execute(Opcode::Divide);
        assert_eq!(m.memory.get(), 2);
        m.execute(Opcode::Modulo);
        assert_eq!(m.memory.get(), 1);
        m.execute(Opcode::CopyBySign);
        assert_eq!(m.memory.get(), 3);
    }

    #[test]
    fn zero_divisor_halts() {
        let mut m = machine();
        assert_eq!(m.execute(Opcode::Divide), Flow::Halt);
        assert_eq!(m.execute(Opcode::Modulo), Flow::Halt);
    }

    #[test]
    fn write_byte_wraps_into_range() {
        let mut m = machine();
        m.memory.set(-191);
        m.execute(Opcode::WriteByte);
        m.memory.set(10);
        m.execute(Opcode::WriteByte);
        assert_eq!(m.output.sink().as_str(), "A\n");
    }

    #[test]
    fn literals_store_code_points() {
        let mut m = machine();
        m.execute(Opcode::Literal('é'));
        assert_eq!(m.memory.get(), 233);
    }

    #[test]
    fn output_mismatch_halts() {
        let mut m = machine();
        m.output.set_target(Some("1"));
        m.memory.set(2);
        assert_eq!(m.execute(Opcode::WriteInteger), Flow::Halt);
        assert!(!m.output.success());
    }
}
