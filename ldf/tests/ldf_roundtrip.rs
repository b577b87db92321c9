use bitstream::{BitReader, BitWriter};
use ldf::{FramedLdf, Ldf, LdfType, LdfValue, Limits};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = LdfValue> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,24}".prop_map(LdfValue::WString),
        any::<i32>().prop_map(LdfValue::S32),
        any::<u32>().prop_map(|bits| LdfValue::F32(f32::from_bits(bits & 0x7F7F_FFFF))),
        any::<i32>().prop_map(|v| LdfValue::F64(f64::from(v) / 8.0)),
        any::<u32>().prop_map(LdfValue::U32),
        any::<bool>().prop_map(LdfValue::Bool),
        any::<i64>().prop_map(LdfValue::S64),
        any::<i64>().prop_map(LdfValue::ObjId),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(LdfValue::Bytes),
    ]
}

proptest! {
    #[test]
    fn prop_framed_roundtrip(entries in prop::collection::vec(("[a-zA-Z_]{1,16}", value_strategy()), 0..16)) {
        let mut ldf = Ldf::new();
        for (key, value) in &entries {
            ldf.write(key, value.clone()).unwrap();
        }

        let mut writer = BitWriter::new();
        ldf.write_framed(&mut writer).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        let decoded = FramedLdf::read(&mut reader, &Limits::default())
            .unwrap()
            .into_plain()
            .unwrap();
        prop_assert!(reader.is_empty());

        let decoded_entries: Vec<_> = decoded.iter().collect();
        prop_assert_eq!(decoded_entries.len(), entries.len());
        for (entry, (key, value)) in decoded_entries.iter().zip(&entries) {
            prop_assert_eq!(&entry.key, key);
            prop_assert_eq!(entry.value.kind(), value.kind());
        }

        // Exact bytes survive a second encode.
        let mut rewriter = BitWriter::new();
        decoded.write_framed(&mut rewriter).unwrap();
        prop_assert_eq!(rewriter.finish(), bytes);
    }
}

#[test]
fn user_info_style_payload_roundtrips_unaligned() {
    let mut ldf = Ldf::new();
    ldf.write("accountID", 1i64).unwrap();
    ldf.write("chatmode", 1i32).unwrap();
    ldf.write("editor_enabled", false).unwrap();
    ldf.write_as("objid", 1_152_921_510_794_154_770i64, LdfType::ObjId)
        .unwrap();
    ldf.write_as("xmlData", "<obj v=\"1\"/>", LdfType::Bytes)
        .unwrap();
    ldf.write("name", "Brickbuilder").unwrap();

    // Start the frame mid-byte to prove nothing assumes alignment.
    let mut writer = BitWriter::new();
    writer.write_bool(true);
    ldf.write_framed(&mut writer).unwrap();
    let bytes = writer.finish();

    let mut reader = BitReader::new(&bytes);
    assert!(reader.read_bool().unwrap());
    let decoded = FramedLdf::read(&mut reader, &Limits::default())
        .unwrap()
        .into_plain()
        .unwrap();

    assert_eq!(decoded, ldf);
    assert_eq!(
        decoded.get("objid"),
        Some(&LdfValue::ObjId(1_152_921_510_794_154_770))
    );
    assert_eq!(
        decoded.get("xmlData"),
        Some(&LdfValue::Bytes(b"<obj v=\"1\"/>".to_vec()))
    );
    let tags: Vec<u8> = decoded.iter().map(|e| e.value.kind().tag()).collect();
    assert_eq!(tags, vec![8, 1, 7, 9, 13, 0]);
}
