use serde::Serialize;

use crate::gesture::GestureState;

/// Text shown by the swarm for one finger count
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FingerMessage {
    pub lines: &'static [&'static str],
    pub font_size: u32,
    pub label: &'static str,
}

/// Finger count 1..=10 → message; index 0 is finger count 1
pub const FINGER_MESSAGES: [FingerMessage; 10] = [
    FingerMessage {
        lines: &["HAII", "SAYANGGG"],
        font_size: 180,
        label: "1 Jari: Halo Sayang",
    },
    FingerMessage {
        lines: &["AKU MAU", "KASIH TAHU", "SESUATU..."],
        font_size: 140,
        label: "2 Jari: Ada sesuatu...",
    },
    FingerMessage {
        lines: &["AKU BANGGA", "BANGET SAMA", "KAMU SAYANG"],
        font_size: 130,
        label: "3 Jari: Bangga sama kamu",
    },
    FingerMessage {
        lines: &["KAMU BAIK,", "CANTIK, HEBAT,", "BERANI MENCOBA", "HAL-HAL BARU"],
        font_size: 100,
        label: "4 Jari: Kamu hebat!",
    },
    FingerMessage {
        lines: &["BEDA SAMA AKU", "YANG TAKUT", "NGELAKUIN", "SESUATU"],
        font_size: 110,
        label: "5 Jari: Kamu beda",
    },
    FingerMessage {
        lines: &["AKU TAKUT GAGAL", "TAPI KAMU", "SELALU BERANI", "DAN KAMU HEBAT"],
        font_size: 100,
        label: "6 Jari: Kamu berani",
    },
    FingerMessage {
        lines: &["BERUNTUNG", "BANGET AKU", "PUNYA KAMU"],
        font_size: 130,
        label: "7 Jari: Beruntung",
    },
    FingerMessage {
        lines: &["THANKS GOD", "FOR GIVE ME", "NAJMITA"],
        font_size: 130,
        label: "8 Jari: Thank You God",
    },
    FingerMessage {
        lines: &["DAN YANG", "TERAKHIR AKU", "MAU NGOMONG..."],
        font_size: 120,
        label: "9 Jari: Yang terakhir...",
    },
    FingerMessage {
        lines: &["I LOVE YOUUU", "MOREEEE", "TUAN PUTRI", "NAJMITAAA ❤️"],
        font_size: 110,
        label: "10 Jari: I LOVE YOU!",
    },
];

/// Two-hand heart message
pub const SPECIAL_LOVE: FingerMessage = FingerMessage {
    lines: &["FOR YOU", "BEAUTIFUL WOMAN", "NAJMITA ZAHIRA"],
    font_size: 130,
    label: "LOVEEE!!! ❤️",
};

pub const FIST_LABEL: &str = "Genggaman (Black Hole)";
pub const IDLE_LABEL: &str = "Gerakkan Tangan...";
pub const FACE_REVEAL_LABEL: &str = "MUKA KITA ✨";
pub const PINCH_LABEL: &str = "📸 Foto Diambil!";

/// Message for a finger count, `None` outside 1..=10
pub fn finger_message(count: u8) -> Option<&'static FingerMessage> {
    match count {
        1..=10 => FINGER_MESSAGES.get(count as usize - 1),
        _ => None,
    }
}

/// Status line for the active gesture
pub fn label_for(gesture: GestureState) -> &'static str {
    match gesture {
        GestureState::Idle => IDLE_LABEL,
        GestureState::Fist => FIST_LABEL,
        GestureState::Pinch => PINCH_LABEL,
        GestureState::FaceReveal => FACE_REVEAL_LABEL,
        GestureState::DoubleLove => SPECIAL_LOVE.label,
        GestureState::Finger(n) => finger_message(n).map_or(IDLE_LABEL, |m| m.label),
    }
}
