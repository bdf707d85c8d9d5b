use crate::cmds::{Cmd, CmdResult};

pub trait Control {
    fn send_cmd(&mut self, cmd: &Cmd) -> CmdResult;

    /// Send `cmds` in order, stopping at the first error.
    fn send_all<'c, I>(&mut self, cmds: I) -> CmdResult
    where
        I: IntoIterator<Item = &'c Cmd>,
        Self: Sized,
    {
        let mut last = Cmd::Noop;
        for cmd in cmds {
            last = self.send_cmd(cmd)?;
        }
        Ok(last)
    }
}
