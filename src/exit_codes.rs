//! Process exit statuses of the `deflist` binary.
//!
//! A script can tell a document that failed to convert (1) apart from a bad invocation
//! or configuration (2).

/// How a `deflist` run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every input was converted and the output written
    Success,
    /// At least one input could not be read or converted; the others were still written
    ConversionFailed,
    /// Bad arguments, bad configuration, or the output could not be written
    ToolError,
}

impl ExitStatus {
    /// Status of a conversion run that got as far as writing output.
    pub fn from_conversion(all_converted: bool) -> Self {
        if all_converted {
            ExitStatus::Success
        } else {
            ExitStatus::ConversionFailed
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::ConversionFailed => 1,
            ExitStatus::ToolError => 2,
        }
    }

    /// Terminate the process with this status.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}
