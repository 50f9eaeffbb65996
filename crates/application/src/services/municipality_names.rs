//! Built-in municipality names
//!
//! Short display names for the metropolitan cities and the county-level
//! municipalities served through the national provider. Sorted by code.

/// `(city code, display name)`, sorted by code
pub const MUNICIPALITY_NAMES: [(&str, &str); 100] = [
    ("12", "세종"),
    ("22", "대구"),
    ("23", "인천"),
    ("24", "광주"),
    ("25", "대전"),
    ("26", "울산"),
    ("32010", "춘천"),
    ("32020", "원주"),
    ("32050", "태백"),
    ("32310", "홍천"),
    ("32360", "철원"),
    ("32410", "양양"),
    ("33010", "청주"),
    ("33020", "충주"),
    ("33030", "제천"),
    ("33320", "보은"),
    ("33330", "옥천"),
    ("33340", "영동"),
    ("33350", "진천"),
    ("33360", "괴산"),
    ("33370", "음성"),
    ("33380", "단양"),
    ("34010", "천안"),
    ("34020", "공주"),
    ("34040", "아산"),
    ("34050", "서산"),
    ("34060", "논산"),
    ("34070", "계룡"),
    ("34330", "부여"),
    ("34390", "당진"),
    ("35010", "전주"),
    ("35020", "군산"),
    ("35040", "정읍"),
    ("35050", "남원"),
    ("35060", "김제"),
    ("35320", "진안"),
    ("35330", "무주"),
    ("35340", "장수"),
    ("35350", "임실"),
    ("35360", "순창"),
    ("35370", "고창"),
    ("35380", "부안"),
    ("36010", "목포"),
    ("36020", "여수"),
    ("36030", "순천"),
    ("36040", "나주"),
    ("36060", "광양"),
    ("36320", "곡성"),
    ("36330", "구례"),
    ("36350", "고흥"),
    ("36380", "장흥"),
    ("36400", "해남"),
    ("36410", "영암"),
    ("36420", "무안"),
    ("36430", "함평"),
    ("36450", "장성"),
    ("36460", "완도"),
    ("36470", "진도"),
    ("36480", "신안"),
    ("37010", "포항"),
    ("37020", "경주"),
    ("37030", "김천"),
    ("37040", "안동"),
    ("37050", "구미"),
    ("37060", "영주"),
    ("37070", "영천"),
    ("37080", "상주"),
    ("37090", "문경"),
    ("37100", "경산"),
    ("37320", "의성"),
    ("37330", "청송"),
    ("37340", "영양"),
    ("37350", "영덕"),
    ("37360", "청도"),
    ("37370", "고령"),
    ("37380", "성주"),
    ("37390", "칠곡"),
    ("37400", "예천"),
    ("37410", "봉화"),
    ("37420", "울진"),
    ("37430", "울릉"),
    ("38010", "창원"),
    ("38030", "진주"),
    ("38050", "통영"),
    ("38060", "사천"),
    ("38070", "김해"),
    ("38080", "밀양"),
    ("38090", "거제"),
    ("38100", "양산"),
    ("38310", "의령"),
    ("38320", "함안"),
    ("38330", "창녕"),
    ("38340", "고성"),
    ("38350", "남해"),
    ("38360", "하동"),
    ("38370", "산청"),
    ("38380", "함양"),
    ("38390", "거창"),
    ("38400", "합천"),
    ("39", "제주"),
];

/// Built-in display name for a city code
#[must_use]
pub fn builtin_name(code: &str) -> Option<&'static str> {
    MUNICIPALITY_NAMES
        .binary_search_by(|(candidate, _)| (*candidate).cmp(code))
        .ok()
        .map(|idx| MUNICIPALITY_NAMES[idx].1)
}
