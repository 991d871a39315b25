use crate::errors::Error;

pub const USERNAME_SIZE: usize = 32;
pub const EMAIL_SIZE: usize = 255;

/// A stored record. `username`/`email` are fixed-size byte buffers, one byte
/// longer than their nominal size to hold a null terminator, matching the
/// on-disk shape a C struct of the same fields would have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Row {
    pub id: i32,
    username: [u8; USERNAME_SIZE + 1],
    email: [u8; EMAIL_SIZE + 1],
}

/// The on-disk/cell size of a row: the packed sum of its fields. This is
/// deliberately not `size_of::<Row>()` — that would include the struct's
/// trailing alignment padding, which the leaf cell layout has no room for.
pub const ROW_SIZE: usize = 4 + (USERNAME_SIZE + 1) + (EMAIL_SIZE + 1);

impl Row {
    pub fn new(id: i32, username: &str, email: &str) -> Result<Self, Error> {
        Ok(Row {
            id,
            username: bounded_text::<{ USERNAME_SIZE + 1 }>(username, "username")?,
            email: bounded_text::<{ EMAIL_SIZE + 1 }>(email, "email")?,
        })
    }

    pub fn username(&self) -> &str {
        cstr(&self.username)
    }

    pub fn email(&self) -> &str {
        cstr(&self.email)
    }

    /// Reads the fixed-size byte representation used as a leaf cell's value.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), ROW_SIZE);
        let id = i32::from_le_bytes(bytes[0..4].try_into().unwrap());
        let mut username = [0u8; USERNAME_SIZE + 1];
        username.copy_from_slice(&bytes[4..4 + USERNAME_SIZE + 1]);
        let mut email = [0u8; EMAIL_SIZE + 1];
        email.copy_from_slice(&bytes[4 + USERNAME_SIZE + 1..ROW_SIZE]);
        Row {
            id,
            username,
            email,
        }
    }

    pub fn write_bytes(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), ROW_SIZE);
        out[0..4].copy_from_slice(&self.id.to_le_bytes());
        out[4..4 + USERNAME_SIZE + 1].copy_from_slice(&self.username);
        out[4 + USERNAME_SIZE + 1..ROW_SIZE].copy_from_slice(&self.email);
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username(), self.email())
    }
}

/// Copies `s` into a zero-padded, null-terminated buffer of size `N`.
/// `N` includes the terminator, so the text itself may be at most `N - 1`
/// bytes; anything longer is a syntax error rather than silent truncation.
fn bounded_text<const N: usize>(s: &str, field: &str) -> Result<[u8; N], Error> {
    let bytes = s.as_bytes();
    if bytes.len() > N - 1 {
        return Err(crate::err!(
            Syntax,
            "{} is too long ({} bytes, max {})",
            field,
            bytes.len(),
            N - 1
        ));
    }
    let mut buf = [0u8; N];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(buf)
}

fn cstr(buf: &[u8]) -> &str {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let row = Row::new(7, "alice", "alice@example.com").unwrap();
        let mut buf = [0u8; ROW_SIZE];
        row.write_bytes(&mut buf);
        let back = Row::from_bytes(&buf);
        assert_eq!(row, back);
        assert_eq!(back.username(), "alice");
        assert_eq!(back.email(), "alice@example.com");
    }

    #[test]
    fn rejects_oversized_fields() {
        let long = "x".repeat(USERNAME_SIZE + 1);
        assert!(Row::new(1, &long, "a@b.c").is_err());
    }
}
