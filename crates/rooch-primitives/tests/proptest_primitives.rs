use proptest::prelude::*;

use rooch_primitives::address::RoochAddress;
use rooch_primitives::bcs::{self, U256};
use rooch_primitives::type_tag::{parse_type_tag, Identifier, StructTag, TypeTag};

/// Strategy for Move identifiers.
fn arb_identifier() -> impl Strategy<Value = Identifier> {
    "[a-zA-Z][a-zA-Z0-9_]{0,12}".prop_map(|s| Identifier::new(s).unwrap())
}

/// Strategy for recursive type tags, bounded in depth and width.
fn arb_type_tag() -> impl Strategy<Value = TypeTag> {
    let leaf = prop_oneof![
        Just(TypeTag::Bool),
        Just(TypeTag::U8),
        Just(TypeTag::U16),
        Just(TypeTag::U32),
        Just(TypeTag::U64),
        Just(TypeTag::U128),
        Just(TypeTag::U256),
        Just(TypeTag::Address),
        Just(TypeTag::Signer),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| TypeTag::Vector(Box::new(t))),
            (
                prop::array::uniform32(any::<u8>()),
                arb_identifier(),
                arb_identifier(),
                prop::collection::vec(inner, 0..3),
            )
                .prop_map(|(addr, module, name, params)| {
                    TypeTag::from(StructTag::new(RoochAddress::new(addr), module, name, params))
                }),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn integers_roundtrip(a in any::<u8>(), b in any::<u16>(), c in any::<u32>(), d in any::<u64>(), e in any::<u128>()) {
        prop_assert_eq!(bcs::from_bytes::<u8>(&bcs::to_bytes(&a).unwrap()).unwrap(), a);
        prop_assert_eq!(bcs::from_bytes::<u16>(&bcs::to_bytes(&b).unwrap()).unwrap(), b);
        prop_assert_eq!(bcs::from_bytes::<u32>(&bcs::to_bytes(&c).unwrap()).unwrap(), c);
        prop_assert_eq!(bcs::from_bytes::<u64>(&bcs::to_bytes(&d).unwrap()).unwrap(), d);
        prop_assert_eq!(bcs::from_bytes::<u128>(&bcs::to_bytes(&e).unwrap()).unwrap(), e);
    }

    #[test]
    fn u256_decimal_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let v = U256::from_le_bytes(bytes);
        prop_assert_eq!(U256::from_dec_str(&v.to_string()).unwrap(), v);
    }

    #[test]
    fn nested_containers_roundtrip(v in prop::collection::vec(
        (any::<Option<u64>>(), ".{0,16}", prop::collection::vec(any::<u8>(), 0..40)),
        0..8,
    )) {
        let value: Vec<(Option<u64>, (String, Vec<u8>))> =
            v.into_iter().map(|(a, b, c)| (a, (b, c))).collect();
        let bytes = bcs::to_bytes(&value).unwrap();
        let decoded: Vec<(Option<u64>, (String, Vec<u8>))> = bcs::from_bytes(&bytes).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn truncated_input_never_decodes(v in prop::collection::vec(any::<u8>(), 1..64)) {
        let bytes = bcs::to_bytes(&v).unwrap();
        let cut = &bytes[..bytes.len() - 1];
        prop_assert!(bcs::from_bytes::<Vec<u8>>(cut).is_err());
    }

    #[test]
    fn type_tag_encoding_roundtrip(tag in arb_type_tag()) {
        let bytes = bcs::to_bytes(&tag).unwrap();
        prop_assert_eq!(bcs::from_bytes::<TypeTag>(&bytes).unwrap(), tag);
    }

    #[test]
    fn type_tag_print_parse_inverse(tag in arb_type_tag()) {
        let text = tag.to_string();
        let parsed = parse_type_tag(&text).unwrap();
        prop_assert_eq!(parsed.to_string(), text);
        prop_assert_eq!(parsed, tag.clone());

        let canonical = tag.to_canonical_string();
        prop_assert_eq!(parse_type_tag(&canonical).unwrap().to_canonical_string(), canonical);
    }

    #[test]
    fn address_text_forms_encode_identically(bytes in prop::array::uniform32(any::<u8>())) {
        let addr = RoochAddress::new(bytes);
        let lower = addr.to_hex();
        let upper = format!("0x{}", hex::encode_upper(bytes));
        let bech = addr.to_bech32().unwrap();
        let expected = bcs::to_bytes(&addr).unwrap();
        for text in [lower, upper, bech] {
            let parsed: RoochAddress = text.parse().unwrap();
            prop_assert_eq!(bcs::to_bytes(&parsed).unwrap(), expected.clone());
        }
    }
}
