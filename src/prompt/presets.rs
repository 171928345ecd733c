/// Durations the form offers, in seconds
pub const DURATIONS: [u32; 3] = [15, 30, 45];

pub const CAMERA_ANGLES: &[&str] = &[
    "มุมมองบุคคลที่หนึ่ง (POV)",
    "มุมมองข้ามไหล่",
    "มุมต่ำ",
    "ถือกล้องสั่นเล็กน้อย (Handheld)",
    "ดอลลี่เข้า / ดอลลี่ซูม",
    "โคลสอัพถ่ายทอดอารมณ์",
    "มาโครโคลสอัพ",
];

pub const LIGHTING_STYLES: &[&str] = &[
    "แสงสไตล์ Netflix",
    "แสงแบบ Low-key",
    "แสงหลักโทนอุ่นนุ่ม + เงาดำ",
    "แสงกระพริบ (สำหรับแนวสยองขวัญ)",
    "ย้อนแสง (Backlight)",
    "แสงที่ขอบ (Glow edge)",
    "โทนสีน้ำเงิน/เขียวอมฟ้า",
];
