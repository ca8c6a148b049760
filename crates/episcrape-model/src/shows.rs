//! Compiled-in IMDb title identifiers, one slice per season, in airing order.

pub(crate) const BREAKING_BAD: &[&[&str]] = &[
    &[
        "tt0959621", "tt1054724", "tt1054725", "tt1054726", "tt1054727", "tt1054728",
        "tt1054729",
    ],
    &[
        "tt1232244", "tt1232249", "tt1232250", "tt1232251", "tt1232252", "tt1232253",
        "tt1232254", "tt1232255", "tt1232256", "tt1232245", "tt1232246", "tt1232247",
        "tt1232248",
    ],
    &[
        "tt1528116", "tt1615186", "tt1615187", "tt1615554", "tt1615555", "tt1615556",
        "tt1615944", "tt1615557", "tt1615558", "tt1615550", "tt1615551", "tt1615552",
        "tt1615553",
    ],
    &[
        "tt1683084", "tt1683089", "tt1683090", "tt1683091", "tt1683092", "tt1683093",
        "tt1683094", "tt1683095", "tt1683096", "tt1683085", "tt1683086", "tt1683087",
        "tt1683088",
    ],
    &[
        "tt2081647", "tt2301457", "tt2301459", "tt2301461", "tt2301463", "tt2301465",
        "tt2301467", "tt2301469", "tt2301471", "tt2301443", "tt2301445", "tt2301447",
        "tt2301449", "tt2301451", "tt2301453", "tt2301455",
    ],
];

pub(crate) const BETTER_CALL_SAUL: &[&[&str]] = &[
    &[
        "tt3464768", "tt3857028", "tt3858672", "tt3864892", "tt3876380", "tt3866650",
        "tt3884286", "tt3895284", "tt3895286", "tt3895288",
    ],
    &[
        "tt3824148", "tt4462674", "tt4462676", "tt4462678", "tt4462682", "tt4462680",
        "tt4462684", "tt4462686", "tt4462688", "tt4462690",
    ],
    &[
        "tt5554490", "tt5579594", "tt5719532", "tt5719534", "tt5719536", "tt5719540",
        "tt5719542", "tt5719546", "tt5719544", "tt5570804",
    ],
    &[
        "tt7073996", "tt7073998", "tt7074002", "tt7074006", "tt7074010", "tt7074012",
        "tt7074020", "tt7074022", "tt7074032", "tt7074030",
    ],
    &[
        "tt8772146", "tt8772148", "tt8772190", "tt8772192", "tt8772194", "tt8772196",
        "tt8772216", "tt8772218", "tt8772220", "tt8772224",
    ],
    &[
        "tt11630814", "tt12187028", "tt12187032", "tt12187036", "tt12187034", "tt12187038",
        "tt12187040", "tt12187044", "tt12187042", "tt12187048", "tt12188568", "tt12188572",
        "tt11630828",
    ],
];
