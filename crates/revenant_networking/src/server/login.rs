//! Login gate: the first packet a server reads from a new connection.

use revenant_shared::{LoginStatus, PacketType};

use crate::error::{NetError, NetResult};
use crate::protocol::{LoginRequest, LoginResponse, PacketReader};

/// Outcome of [`check_login`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginCheck {
    /// Wire checks passed; the credentials still need verifying.
    Accepted {
        /// `LogIn` or `CreateAccount`.
        packet_type: PacketType,
        /// Decoded credentials.
        request: LoginRequest,
    },
    /// The session must be refused with this response.
    Rejected(LoginResponse),
}

impl LoginCheck {
    /// Final response to send. `verify` is only consulted for accepted
    /// requests (account lookup, password check, ban list).
    pub fn into_response<F>(self, verify: F) -> LoginResponse
    where
        F: FnOnce(PacketType, &LoginRequest) -> LoginResponse,
    {
        match self {
            Self::Accepted {
                packet_type,
                request,
            } => verify(packet_type, &request),
            Self::Rejected(response) => response,
        }
    }
}

/// Validates a `LogIn` or `CreateAccount` packet.
///
/// The protocol version is checked before any credential is read; a
/// mismatch yields [`LoginStatus::ProtocolVersionMismatch`].
///
/// # Errors
///
/// [`NetError::UnexpectedPacket`] for any other packet type, or a cursor
/// error if the credentials are malformed.
pub fn check_login(bytes: &[u8], expected_version: i32) -> NetResult<LoginCheck> {
    let mut reader = PacketReader::new(bytes);
    let packet_type = reader.read_packet_type()?;
    if !matches!(packet_type, PacketType::LogIn | PacketType::CreateAccount) {
        return Err(NetError::UnexpectedPacket(packet_type));
    }

    match LoginRequest::decode_body(&mut reader, expected_version) {
        Ok(request) => {
            tracing::info!("Login request from {:?}", request.username);
            Ok(LoginCheck::Accepted {
                packet_type,
                request,
            })
        }
        Err(NetError::ProtocolMismatch { expected, received }) => {
            tracing::warn!(
                "Refusing client with protocol version {} (expected {})",
                received,
                expected
            );
            Ok(LoginCheck::Rejected(LoginResponse::failure(
                LoginStatus::ProtocolVersionMismatch,
            )))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::empty_packet;

    fn request(version: i32) -> LoginRequest {
        LoginRequest {
            protocol_version: version,
            username: "ash".into(),
            password: "pw".into(),
        }
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let packet = request(1).encode(PacketType::LogIn);
        let check = check_login(&packet, 2).unwrap();
        assert_eq!(
            check,
            LoginCheck::Rejected(LoginResponse::failure(LoginStatus::ProtocolVersionMismatch))
        );
        let response = check.into_response(|_, _| unreachable!());
        assert_eq!(response.status, LoginStatus::ProtocolVersionMismatch);
    }

    #[test]
    fn test_accepted_goes_through_verifier() {
        let packet = request(2).encode(PacketType::CreateAccount);
        let response = check_login(&packet, 2)
            .unwrap()
            .into_response(|packet_type, request| {
                assert_eq!(packet_type, PacketType::CreateAccount);
                assert_eq!(request.username, "ash");
                LoginResponse::success(17)
            });
        assert_eq!(response, LoginResponse::success(17));
    }

    #[test]
    fn test_other_packets_refused() {
        let packet = empty_packet(PacketType::LogOut);
        assert_eq!(
            check_login(&packet, 2),
            Err(NetError::UnexpectedPacket(PacketType::LogOut))
        );
    }

    #[test]
    fn test_truncated_credentials() {
        let mut packet = request(2).encode(PacketType::LogIn);
        packet.truncate(10);
        assert!(matches!(check_login(&packet, 2), Err(NetError::Truncated { .. })));
    }
}
