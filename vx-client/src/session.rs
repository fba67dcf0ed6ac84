//! Session state: connection phase, login and studio gates, cached line states
//!
//! Only [`dispatch`](crate::dispatch) and the connection lifecycle mutate a
//! session; callers get read-only snapshots.

use std::collections::HashMap;

use serde::Serialize;
use vx_api::{IdRule, LineStateRule, OperationSpec};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub state: ConnectionState,
    pub authenticated: bool,
    pub studio_selected: bool,
    /// Studio id reported by the last selection acknowledgment
    pub studio_id: Option<i64>,
    pub show_id: Option<i64>,
    /// Last `state` seen per line id
    pub line_states: HashMap<String, String>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Back to a fresh, disconnected session
    pub fn reset(&mut self) {
        *self = Session::default();
    }

    pub fn line_state(&self, line: &str) -> Option<&str> {
        self.line_states.get(line).map(String::as_str)
    }

    pub(crate) fn record_line_state(&mut self, line: &str, state: &str) {
        self.line_states.insert(line.to_string(), state.to_string());
    }

    /// Login and studio gates of `spec`
    pub fn check_gates(&self, spec: &OperationSpec) -> Result<(), ClientError> {
        if spec.requires_login && !self.authenticated {
            return Err(ClientError::LoginRequired { method: spec.method });
        }
        if spec.requires_studio && !self.studio_selected {
            return Err(ClientError::StudioRequired { method: spec.method });
        }
        Ok(())
    }

    /// Line-state precondition of `spec` for the addressed line
    pub fn check_line_state(&self, spec: &OperationSpec, line: Option<&str>) -> Result<(), ClientError> {
        if spec.line_state == LineStateRule::Any || !matches!(spec.id, IdRule::Arg(_) | IdRule::Fixed(_)) {
            return Ok(());
        }
        let Some(line) = line else {
            return Ok(());
        };
        let state = self.line_state(line);
        if spec.line_state.permits(state) {
            Ok(())
        } else {
            Err(ClientError::LineState {
                method: spec.method,
                line: line.to_string(),
                state: state.unwrap_or_default().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vx_api::catalog::{cc, line, studio};

    #[test]
    fn test_gates_in_order() {
        let mut session = Session::default();
        assert!(matches!(
            session.check_gates(&studio::GET_STUDIO),
            Err(ClientError::LoginRequired { method: "get_studio" })
        ));
        assert!(session.check_gates(&cc::GET_SERVER).is_ok());

        session.authenticated = true;
        assert!(matches!(
            session.check_gates(&studio::GET_STUDIO),
            Err(ClientError::StudioRequired { .. })
        ));
        assert!(session.check_gates(&studio::SELECT_STUDIO).is_ok());

        session.studio_selected = true;
        assert!(session.check_gates(&studio::GET_STUDIO).is_ok());
    }

    #[test]
    fn test_line_state_uses_cache() {
        let mut session = Session::default();
        assert!(session.check_line_state(&line::LOCK_LINE, Some("2")).is_ok());

        session.record_line_state("2", "IDLE");
        let err = session.check_line_state(&line::LOCK_LINE, Some("2")).unwrap_err();
        assert!(err.to_string().contains("line 2 is IDLE"));
        assert!(session.check_line_state(&line::SET_LINE_COMMENT, Some("2")).is_err());

        session.record_line_state("2", "ON_AIR");
        assert!(session.check_line_state(&line::LOCK_LINE, Some("2")).is_ok());
        assert!(session.check_line_state(&line::UNLOCK_LINE, Some("2")).is_err());
    }

    #[test]
    fn test_reset_clears_flags() {
        let mut session = Session {
            state: ConnectionState::Connected,
            authenticated: true,
            studio_selected: true,
            studio_id: Some(1),
            ..Default::default()
        };
        session.reset();
        assert_eq!(session, Session::default());
    }
}
