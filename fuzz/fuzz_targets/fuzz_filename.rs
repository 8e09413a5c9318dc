#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_formdata::filename::generate;

#[derive(Arbitrary, Debug)]
struct FuzzFilename {
    original: String,
    random: [u8; 8],
}

fuzz_target!(|input: FuzzFilename| {
    // 生成に成功した名前はディレクトリの外を指さない
    if let Ok(name) = generate(&input.original, input.random) {
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
        assert!(!name.chars().any(char::is_control));
        assert!(name != "." && name != "..");
    }
});
