//! System Calls.
//!
//! The call number is in `v0` and arguments in `a0`..`a3`; the result, when
//! there is one, is returned in `v0`. The PC is stepped past the `syscall`
//! before the call is serviced.

use tracing::{debug, info};

use super::process::{ExitStatus, ProcessState};
use super::{Control, Kernel, KernelError};
use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::Pid;
use crate::core::Cpu;
use crate::isa::abi;

/// System call numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum Syscall {
    /// Stop the machine.
    Halt = 0,
    /// End the calling process with status `a0`.
    Exit = 1,
    /// Start a program from the file system.
    Exec = 2,
    /// Wait for child `a0` to exit, storing its status at `a1`.
    Join = 3,
    /// Create a file.
    Create = 4,
    /// Open a file.
    Open = 5,
    /// Read from a file.
    Read = 6,
    /// Write to a file.
    Write = 7,
    /// Close a file.
    Close = 8,
    /// Remove a file.
    Unlink = 9,
}

impl Syscall {
    /// Decodes a call number.
    pub const fn from_number(number: i32) -> Option<Self> {
        Some(match number {
            0 => Self::Halt,
            1 => Self::Exit,
            2 => Self::Exec,
            3 => Self::Join,
            4 => Self::Create,
            5 => Self::Open,
            6 => Self::Read,
            7 => Self::Write,
            8 => Self::Close,
            9 => Self::Unlink,
            _ => return None,
        })
    }
}

impl Kernel {
    /// Services the syscall raised by the running process.
    pub(super) fn syscall(&mut self, cpu: &mut Cpu) -> Result<Control, KernelError> {
        let pid = self.current.ok_or(KernelError::NoCurrentProcess)?;
        let number = cpu.regs.read(abi::REG_V0);
        let a0 = cpu.regs.read(abi::REG_A0);
        let a1 = cpu.regs.read(abi::REG_A1);

        let next = cpu
            .regs
            .read_u32(abi::REG_NEXT_PC)
            .wrapping_add(INSTRUCTION_SIZE);
        cpu.advance_pc(next);

        let call = Syscall::from_number(number);
        debug!(pid, number, ?call, "syscall");
        let result = match call {
            Some(Syscall::Halt) => {
                info!(pid, "halt requested");
                return Ok(Control::Halt);
            }
            Some(Syscall::Exit) => {
                self.terminate(cpu, pid, ExitStatus::Exited(a0))?;
                None
            }
            Some(Syscall::Join) => self.join(cpu, pid, a0, a1 as u32)?,
            _ => Some(-1),
        };

        if let Some(value) = result {
            cpu.regs.write(abi::REG_V0, value);
        }
        Ok(Control::Continue)
    }

    /// Joins child `child` of `pid`.
    ///
    /// # Returns
    ///
    /// `Some(1)` or `Some(0)` if the child already exited normally or abnormally,
    /// `Some(-1)` if `child` is not a child of `pid`, and `None` once the caller
    /// is blocked until the child exits.
    fn join(
        &mut self,
        cpu: &mut Cpu,
        pid: Pid,
        child: i32,
        status_addr: u32,
    ) -> Result<Option<i32>, KernelError> {
        let Ok(child) = Pid::try_from(child) else {
            return Ok(Some(-1));
        };
        let me = self
            .processes
            .get_mut(pid)
            .ok_or(KernelError::UnknownPid(pid))?;

        if let Some(pos) = me.exited_children.iter().position(|(c, _)| *c == child) {
            let (_, status) = me.exited_children.remove(pos);
            if status_addr != 0 {
                self.write_user_word(cpu, status_addr, status.code() as u32)?;
            }
            return Ok(Some(i32::from(status.is_normal())));
        }

        let is_child = self
            .processes
            .get(child)
            .is_some_and(|c| c.parent == Some(pid));
        if !is_child {
            return Ok(Some(-1));
        }

        let me = self
            .processes
            .get_mut(pid)
            .ok_or(KernelError::UnknownPid(pid))?;
        me.state = ProcessState::Waiting;
        me.joining = Some(child);
        me.status_addr = status_addr;
        Ok(None)
    }
}
