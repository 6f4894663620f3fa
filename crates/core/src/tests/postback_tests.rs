// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CoreError, Postback};
use shiftbot_domain::{Decision, RequestId, RequestKind};

fn decide(kind: RequestKind, decision: Decision, id: &str) -> Postback {
    Postback::Decide {
        kind,
        decision,
        request_id: RequestId::parse(id).unwrap(),
    }
}

#[test]
fn test_longer_prefixes_win_over_shorter_ones() {
    assert_eq!(
        Postback::parse("approve_addition_addition_1_ab").unwrap(),
        decide(RequestKind::Addition, Decision::Approve, "addition_1_ab")
    );
    assert_eq!(
        Postback::parse("reject_deletion_deletion_1_ab").unwrap(),
        decide(RequestKind::Deletion, Decision::Reject, "deletion_1_ab")
    );
    assert_eq!(
        Postback::parse("approve_exchange_1_ab").unwrap(),
        decide(RequestKind::Exchange, Decision::Approve, "exchange_1_ab")
    );
    assert_eq!(
        Postback::parse("deletion_shift_12").unwrap(),
        Postback::SelectDeletionShift { shift_id: 12 }
    );
    assert_eq!(
        Postback::parse("shift_12").unwrap(),
        Postback::SelectExchangeShift { shift_id: 12 }
    );
}

#[test]
fn test_cancel_targets_exchange_requests() {
    assert_eq!(
        Postback::parse("cancel_exchange_5_ff").unwrap(),
        decide(RequestKind::Exchange, Decision::Cancel, "exchange_5_ff")
    );
}

#[test]
fn test_tokens_parse_back_to_the_same_action() {
    let actions = vec![
        Postback::SelectExchangeShift { shift_id: 3 },
        Postback::SelectDeletionShift { shift_id: 4 },
        decide(RequestKind::Exchange, Decision::Reject, "exchange_1_a"),
        decide(RequestKind::Addition, Decision::Reject, "addition_1_a"),
        decide(RequestKind::Deletion, Decision::Approve, "deletion_1_a"),
    ];
    for action in actions {
        assert_eq!(Postback::parse(&action.token()).unwrap(), action);
    }
}

#[test]
fn test_unknown_and_malformed_tokens() {
    assert!(matches!(
        Postback::parse("launch_rocket"),
        Err(CoreError::UnknownPostback(_))
    ));
    assert!(matches!(
        Postback::parse("shift_abc"),
        Err(CoreError::MalformedPostback { .. })
    ));
    assert!(matches!(
        Postback::parse("approve_"),
        Err(CoreError::MalformedPostback { .. })
    ));
}
