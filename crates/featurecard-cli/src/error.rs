use anyhow::Error;
use featurecard_config::ConfigError;
use featurecard_core::CoreError;
use featurecard_phone::PhoneError;
use featurecard_vcf::VcfError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
    if exit_code_byte(err) == EXIT_INVALID_INPUT {
        eprintln!();
        eprintln!("For more information, try '--help'.");
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_code_byte(err))
}

fn exit_code_byte(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(CliError::InvalidInput(_)) = cause.downcast_ref::<CliError>() {
            return EXIT_INVALID_INPUT;
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return EXIT_INVALID_INPUT;
        }
        if let Some(vcf_err) = cause.downcast_ref::<VcfError>() {
            return vcf_exit_code(vcf_err);
        }
        if cause.downcast_ref::<PhoneError>().is_some() {
            return EXIT_INVALID_INPUT;
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return EXIT_INVALID_INPUT;
        }
    }
    EXIT_FAILURE
}

fn vcf_exit_code(err: &VcfError) -> u8 {
    if err.is_strictness() {
        EXIT_FAILURE
    } else {
        EXIT_INVALID_INPUT
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_code_byte, invalid_input, EXIT_FAILURE, EXIT_INVALID_INPUT};
    use anyhow::anyhow;
    use featurecard_vcf::VcfError;

    #[test]
    fn invalid_input_maps_to_exit_three() {
        let err = invalid_input("no input").context("convert");
        assert_eq!(exit_code_byte(&err), EXIT_INVALID_INPUT);
    }

    #[test]
    fn strictness_violation_is_a_write_failure() {
        let err = anyhow::Error::new(VcfError::Unsupported {
            contact: "Jane".to_string(),
            item: "property NICKNAME".to_string(),
        })
        .context("serialize contacts");
        assert_eq!(exit_code_byte(&err), EXIT_FAILURE);
    }

    #[test]
    fn unknown_errors_are_failures() {
        assert_eq!(exit_code_byte(&anyhow!("disk full")), EXIT_FAILURE);
    }
}
