pub mod configuration;

pub mod binning {
    pub mod binning;
    pub mod boundarycache;
    pub mod uniformbinning;
    pub mod irregularbinning;
    pub mod parametricbingrid;
    pub mod binningmanager;
}

pub mod manager {
    pub mod namedobject;
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod density;
    pub mod densityerror;

    pub mod chebychev {
        pub mod chebychevseries;
        pub mod polynomialexpansion;
        pub mod expansionmanager;
    }

    pub mod chisquare {
        pub mod chisquaredensity;
        pub mod chisquaremanager;
    }
}

pub mod parameter {
    pub mod realfunction;
    pub mod constantfunction;
    pub mod derivedfunction;
    pub mod realvariable;
    pub mod parametermanager;
}
