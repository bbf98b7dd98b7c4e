// Current module imports
use super::errors::DnsWireError;

/// TXT resource record type.
pub const TYPE_TXT: u16 = 16;
/// CHAOS class, used by convention for resolver self-identification
/// records.
pub const CLASS_CHAOS: u16 = 3;

const HEADER_LEN: usize = 12;
const FLAG_QR: u16 = 0x8000;
const FLAG_TC: u16 = 0x0200;

/// Builds a single-question TXT/CHAOS query with the given transaction id.
/// Recursion is not requested; the addressed server is the authority for
/// the name.
pub fn build_txt_query(id: u16, name: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(HEADER_LEN + name.len() + 6);
    message.extend_from_slice(&id.to_be_bytes());
    message.extend_from_slice(&0u16.to_be_bytes()); // flags: standard query
    message.extend_from_slice(&1u16.to_be_bytes()); // QDCOUNT
    message.extend_from_slice(&0u16.to_be_bytes()); // ANCOUNT
    message.extend_from_slice(&0u16.to_be_bytes()); // NSCOUNT
    message.extend_from_slice(&0u16.to_be_bytes()); // ARCOUNT
    write_name(&mut message, name);
    message.extend_from_slice(&TYPE_TXT.to_be_bytes());
    message.extend_from_slice(&CLASS_CHAOS.to_be_bytes());
    message
}

/// Parses and validates the response to [`build_txt_query`], returning the
/// single TXT string.
///
/// Validation order: header length, transaction id, QR flag, TC flag,
/// response code, answer count, then the one answer's name/type/class
/// against the query, then exactly one non-empty TXT character-string.
pub fn parse_txt_response(id: u16, name: &str, payload: &[u8]) -> Result<String, DnsWireError> {
    if payload.len() < HEADER_LEN {
        return Err(DnsWireError::TooShort);
    }

    let response_id = read_u16(payload, 0)?;
    if response_id != id {
        return Err(DnsWireError::IdMismatch {
            query: id,
            response: response_id,
        });
    }

    let flags = read_u16(payload, 2)?;
    if flags & FLAG_QR == 0 {
        return Err(DnsWireError::NotAResponse);
    }
    if flags & FLAG_TC != 0 {
        return Err(DnsWireError::Truncated);
    }
    let rcode = (flags & 0x000f) as u8;
    if rcode != 0 {
        return Err(DnsWireError::ResponseCode(rcode));
    }

    let qdcount = read_u16(payload, 4)?;
    let ancount = read_u16(payload, 6)?;
    if ancount != 1 {
        return Err(DnsWireError::AnswerCount(ancount));
    }

    // Skip whatever question section the server echoed back.
    let mut offset = HEADER_LEN;
    for _ in 0..qdcount {
        let (_, next) = read_name(payload, offset)?;
        offset = next + 4; // QTYPE + QCLASS
        if offset > payload.len() {
            return Err(DnsWireError::UnexpectedEnd);
        }
    }

    let (answer_name, next) = read_name(payload, offset)?;
    offset = next;
    let answer_type = read_u16(payload, offset)?;
    let answer_class = read_u16(payload, offset + 2)?;
    // TTL (4 bytes) is irrelevant here.
    let rdlength = read_u16(payload, offset + 8)? as usize;
    offset += 10;

    let want_name = canonical_name(name);
    if answer_name != want_name {
        return Err(DnsWireError::NameMismatch {
            want: want_name,
            got: answer_name,
        });
    }
    if answer_type != TYPE_TXT {
        return Err(DnsWireError::TypeMismatch {
            want: TYPE_TXT,
            got: answer_type,
        });
    }
    if answer_class != CLASS_CHAOS {
        return Err(DnsWireError::ClassMismatch {
            want: CLASS_CHAOS,
            got: answer_class,
        });
    }

    let rdata = payload
        .get(offset..offset + rdlength)
        .ok_or(DnsWireError::UnexpectedEnd)?;
    let strings = read_txt_strings(rdata)?;
    if strings.len() != 1 {
        return Err(DnsWireError::TxtStringCount(strings.len()));
    }
    let text = &strings[0];
    if text.is_empty() {
        return Err(DnsWireError::EmptyTxtString);
    }
    String::from_utf8(text.clone()).map_err(|_| DnsWireError::InvalidUtf8)
}

fn write_name(message: &mut Vec<u8>, name: &str) {
    for label in name.split('.').filter(|label| !label.is_empty()) {
        message.push(label.len() as u8);
        message.extend_from_slice(label.as_bytes());
    }
    message.push(0);
}

fn read_u16(payload: &[u8], offset: usize) -> Result<u16, DnsWireError> {
    let bytes = payload
        .get(offset..offset + 2)
        .ok_or(DnsWireError::UnexpectedEnd)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Reads a possibly-compressed name starting at `offset`, returning the
/// lowercased dotted name and the offset just past the name's in-place
/// encoding.
fn read_name(payload: &[u8], offset: usize) -> Result<(String, usize), DnsWireError> {
    let mut labels: Vec<String> = Vec::new();
    let mut cursor = offset;
    let mut next = None;
    let mut jumps = 0usize;

    loop {
        let length = *payload.get(cursor).ok_or(DnsWireError::UnexpectedEnd)?;
        match length {
            0 => {
                let end = next.unwrap_or(cursor + 1);
                return Ok((labels.join("."), end));
            }
            1..=63 => {
                let label = payload
                    .get(cursor + 1..cursor + 1 + length as usize)
                    .ok_or(DnsWireError::UnexpectedEnd)?;
                labels.push(String::from_utf8_lossy(label).to_lowercase());
                cursor += 1 + length as usize;
            }
            length if length & 0xc0 == 0xc0 => {
                // A pointer cannot point forward past itself more than the
                // message has bytes; bounding the jump count rejects loops.
                jumps += 1;
                if jumps > payload.len() {
                    return Err(DnsWireError::PointerLoop);
                }
                let low = *payload
                    .get(cursor + 1)
                    .ok_or(DnsWireError::UnexpectedEnd)?;
                if next.is_none() {
                    next = Some(cursor + 2);
                }
                cursor = usize::from(length & 0x3f) << 8 | usize::from(low);
            }
            other => return Err(DnsWireError::BadLabel(other)),
        }
    }
}

fn read_txt_strings(rdata: &[u8]) -> Result<Vec<Vec<u8>>, DnsWireError> {
    let mut strings = Vec::new();
    let mut cursor = 0usize;
    while cursor < rdata.len() {
        let length = rdata[cursor] as usize;
        let text = rdata
            .get(cursor + 1..cursor + 1 + length)
            .ok_or(DnsWireError::UnexpectedEnd)?;
        strings.push(text.to_vec());
        cursor += 1 + length;
    }
    Ok(strings)
}

fn canonical_name(name: &str) -> String {
    name.trim_end_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "whoami.cloudflare";
    const ID: u16 = 0x2b67;

    /// Builds a response whose answer name is a compression pointer to the
    /// question name, the way real resolvers answer.
    fn response(
        id: u16,
        flags: u16,
        ancount: u16,
        answers: &[(&str, u16, u16, &[&[u8]])],
    ) -> Vec<u8> {
        let mut message = Vec::new();
        message.extend_from_slice(&id.to_be_bytes());
        message.extend_from_slice(&flags.to_be_bytes());
        message.extend_from_slice(&1u16.to_be_bytes());
        message.extend_from_slice(&ancount.to_be_bytes());
        message.extend_from_slice(&0u16.to_be_bytes());
        message.extend_from_slice(&0u16.to_be_bytes());
        write_name(&mut message, NAME);
        message.extend_from_slice(&TYPE_TXT.to_be_bytes());
        message.extend_from_slice(&CLASS_CHAOS.to_be_bytes());

        for (name, rtype, rclass, strings) in answers {
            if *name == NAME {
                message.extend_from_slice(&[0xc0, 0x0c]);
            } else {
                write_name(&mut message, name);
            }
            message.extend_from_slice(&rtype.to_be_bytes());
            message.extend_from_slice(&rclass.to_be_bytes());
            message.extend_from_slice(&0u32.to_be_bytes());
            let rdlength: usize = strings.iter().map(|s| s.len() + 1).sum();
            message.extend_from_slice(&(rdlength as u16).to_be_bytes());
            for string in *strings {
                message.push(string.len() as u8);
                message.extend_from_slice(string);
            }
        }
        message
    }

    fn good_response() -> Vec<u8> {
        response(
            ID,
            FLAG_QR,
            1,
            &[(NAME, TYPE_TXT, CLASS_CHAOS, &[b"203.0.113.7"])],
        )
    }

    #[test]
    fn query_layout() {
        let query = build_txt_query(ID, NAME);
        assert_eq!(&query[..2], &ID.to_be_bytes());
        // Standard query, recursion not requested.
        assert_eq!(&query[2..4], &[0, 0]);
        assert_eq!(&query[4..6], &[0, 1]);
        // "whoami" label follows the header.
        assert_eq!(query[HEADER_LEN], 6);
        assert_eq!(&query[HEADER_LEN + 1..HEADER_LEN + 7], b"whoami");
        assert_eq!(*query.last().unwrap(), CLASS_CHAOS as u8);
    }

    #[test]
    fn round_trip_recovers_the_txt_string() {
        let text = parse_txt_response(ID, NAME, &good_response()).unwrap();
        assert_eq!(text, "203.0.113.7");
    }

    #[test]
    fn wrong_transaction_id() {
        let err = parse_txt_response(ID + 1, NAME, &good_response()).unwrap_err();
        assert_eq!(
            err,
            DnsWireError::IdMismatch {
                query: ID + 1,
                response: ID,
            }
        );
    }

    #[test]
    fn qr_flag_unset() {
        let message = response(ID, 0, 1, &[(NAME, TYPE_TXT, CLASS_CHAOS, &[b"x"])]);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::NotAResponse)
        );
    }

    #[test]
    fn tc_flag_set() {
        let message = response(
            ID,
            FLAG_QR | FLAG_TC,
            1,
            &[(NAME, TYPE_TXT, CLASS_CHAOS, &[b"x"])],
        );
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::Truncated)
        );
    }

    #[test]
    fn non_success_response_code() {
        let message = response(ID, FLAG_QR | 2, 1, &[(NAME, TYPE_TXT, CLASS_CHAOS, &[b"x"])]);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::ResponseCode(2))
        );
    }

    #[test]
    fn zero_answers() {
        let message = response(ID, FLAG_QR, 0, &[]);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::AnswerCount(0))
        );
    }

    #[test]
    fn two_answers() {
        let answers: &[(&str, u16, u16, &[&[u8]])] = &[
            (NAME, TYPE_TXT, CLASS_CHAOS, &[b"a"]),
            (NAME, TYPE_TXT, CLASS_CHAOS, &[b"b"]),
        ];
        let message = response(ID, FLAG_QR, 2, answers);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::AnswerCount(2))
        );
    }

    #[test]
    fn answer_name_mismatch() {
        let message = response(
            ID,
            FLAG_QR,
            1,
            &[("whoami.example", TYPE_TXT, CLASS_CHAOS, &[b"x"])],
        );
        assert!(matches!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::NameMismatch { .. })
        ));
    }

    #[test]
    fn answer_type_mismatch() {
        let message = response(ID, FLAG_QR, 1, &[(NAME, 1, CLASS_CHAOS, &[b"x"])]);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::TypeMismatch {
                want: TYPE_TXT,
                got: 1,
            })
        );
    }

    #[test]
    fn answer_class_mismatch() {
        let message = response(ID, FLAG_QR, 1, &[(NAME, TYPE_TXT, 1, &[b"x"])]);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::ClassMismatch {
                want: CLASS_CHAOS,
                got: 1,
            })
        );
    }

    #[test]
    fn empty_txt_record() {
        let strings: &[&[u8]] = &[];
        let message = response(ID, FLAG_QR, 1, &[(NAME, TYPE_TXT, CLASS_CHAOS, strings)]);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::TxtStringCount(0))
        );
    }

    #[test]
    fn two_txt_strings() {
        let strings: &[&[u8]] = &[b"203.0.113.7", b"extra"];
        let message = response(ID, FLAG_QR, 1, &[(NAME, TYPE_TXT, CLASS_CHAOS, strings)]);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::TxtStringCount(2))
        );
    }

    #[test]
    fn single_empty_txt_string() {
        let strings: &[&[u8]] = &[b""];
        let message = response(ID, FLAG_QR, 1, &[(NAME, TYPE_TXT, CLASS_CHAOS, strings)]);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::EmptyTxtString)
        );
    }

    #[test]
    fn short_and_mangled_payloads() {
        assert_eq!(
            parse_txt_response(ID, NAME, &[0u8; 5]),
            Err(DnsWireError::TooShort)
        );

        let mut message = good_response();
        message.truncate(message.len() - 4);
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::UnexpectedEnd)
        );
    }

    #[test]
    fn pointer_loop_is_rejected() {
        // Header + a name that points at itself.
        let mut message = Vec::new();
        message.extend_from_slice(&ID.to_be_bytes());
        message.extend_from_slice(&FLAG_QR.to_be_bytes());
        message.extend_from_slice(&1u16.to_be_bytes());
        message.extend_from_slice(&1u16.to_be_bytes());
        message.extend_from_slice(&0u16.to_be_bytes());
        message.extend_from_slice(&0u16.to_be_bytes());
        message.extend_from_slice(&[0xc0, 0x0c]);
        message.extend_from_slice(&TYPE_TXT.to_be_bytes());
        message.extend_from_slice(&CLASS_CHAOS.to_be_bytes());
        assert_eq!(
            parse_txt_response(ID, NAME, &message),
            Err(DnsWireError::PointerLoop)
        );
    }
}
