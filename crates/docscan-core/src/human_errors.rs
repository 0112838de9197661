// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for whoever is holding the camera.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The core never prints these itself; front ends decide how to show them.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A better photo will probably fix it.
    Retake,
    /// User must do something (fix a path, a setting, install models).
    ActionRequired,
    /// Cannot be fixed by retrying: wrong file type, internal fault.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying again with a new photo is worthwhile.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError`.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::Decode(_) => HumanError {
            message: "This file isn't an image we can read.".into(),
            suggestion: "Save the photo as a JPEG or PNG and try again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::DocumentNotFound { .. } => HumanError {
            message: "Could not detect the document.".into(),
            suggestion: "Photograph the page on a plain, contrasting surface with all four corners visible.".into(),
            retriable: true,
            severity: Severity::Retake,
        },

        ScanError::DegenerateGeometry(_) => HumanError {
            message: "The page outline is too distorted to straighten.".into(),
            suggestion: "Take the photo more directly from above so the page looks roughly rectangular.".into(),
            retriable: true,
            severity: Severity::Retake,
        },

        ScanError::Ocr(detail) => {
            if detail.contains("model not found") {
                HumanError {
                    message: "Text recognition isn't set up yet.".into(),
                    suggestion: "Download the OCR models and point the scanner at their folder.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "Text recognition didn't work on this scan.".into(),
                    suggestion: "Try again with better lighting, making sure the text is sharp and in focus.".into(),
                    retriable: true,
                    severity: Severity::Retake,
                }
            }
        }

        ScanError::Config(detail) => HumanError {
            message: "A scanner setting is invalid.".into(),
            suggestion: format!("Fix the configuration file and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or copy the file somewhere else first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::ActionRequired,
                }
            }
        }

        ScanError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Check that it is valid JSON.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_not_found_asks_for_retake() {
        let human = humanize_error(&ScanError::DocumentNotFound { candidates: 0 });
        assert_eq!(human.severity, Severity::Retake);
        assert!(human.retriable);
        assert_eq!(human.message, "Could not detect the document.");
    }

    #[test]
    fn decode_is_permanent() {
        let human = humanize_error(&ScanError::Decode("bad magic".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn missing_models_are_action_required() {
        let err = ScanError::Ocr("detection model not found at /x".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = ScanError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "nope"));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn config_detail_is_kept() {
        let human = humanize_error(&ScanError::Config("enhance.upscale must be at least 1".into()));
        assert!(human.suggestion.contains("enhance.upscale"));
    }
}
