//! Parameter tables for the NWB classes whose constructors feed the metadata schemas.

use super::descriptor::{
    ClassSpec, DeclaredType, DefaultValue, ParameterDescriptor as P, TypeKind,
};

const STR: DeclaredType = DeclaredType::Single(TypeKind::Str);
const FLOAT: DeclaredType = DeclaredType::Single(TypeKind::Float);
const INT: DeclaredType = DeclaredType::Single(TypeKind::Unsupported("int"));
const ARRAY_DATA: DeclaredType = DeclaredType::Tuple(&[
    TypeKind::Unsupported("array_data"),
    TypeKind::Unsupported("data"),
]);
const ITERABLE: DeclaredType = DeclaredType::Single(TypeKind::Unsupported("Iterable"));

/// `hdmf.common.table.DynamicTableRegion` (outside the NWB ecosystem).
pub static DYNAMIC_TABLE_REGION: ClassSpec = ClassSpec {
    module: "hdmf.common.table",
    name: "DynamicTableRegion",
    params: &[
        P::required("name", STR, "the name of this VectorData"),
        P::required("data", ARRAY_DATA, "a dataset where the first dimension is a key"),
        P::required("description", STR, "a description of what this region represents"),
    ],
    allow_extra: None,
};

/// `pynwb.device.Device`
pub static DEVICE: ClassSpec = ClassSpec {
    module: "pynwb.device",
    name: "Device",
    params: &[
        P::required("name", STR, "the name of this device"),
        P::optional(
            "description",
            STR,
            "Description of the device (e.g., model, firmware version, processing software \
             version, etc.)",
        ),
        P::optional("manufacturer", STR, "the name of the manufacturer of this device"),
    ],
    allow_extra: None,
};

/// `pynwb.ecephys.ElectrodeGroup`
pub static ELECTRODE_GROUP: ClassSpec = ClassSpec {
    module: "pynwb.ecephys",
    name: "ElectrodeGroup",
    params: &[
        P::required("name", STR, "the name of this electrode group"),
        P::required("description", STR, "description of this electrode group"),
        P::required("location", STR, "description of location of this electrode group"),
        P::required(
            "device",
            DeclaredType::Single(TypeKind::Class(&DEVICE)),
            "the device that was used to record from this electrode group",
        ),
        P::optional(
            "position",
            ARRAY_DATA,
            "stereotaxic position of this electrode group (x, y, z)",
        ),
    ],
    allow_extra: None,
};

/// `pynwb.base.TimeSeries`
pub static TIME_SERIES: ClassSpec = ClassSpec {
    module: "pynwb.base",
    name: "TimeSeries",
    params: &[
        P::required("name", STR, "The name of this TimeSeries dataset"),
        P::required(
            "data",
            DeclaredType::Tuple(&[
                TypeKind::Unsupported("array_data"),
                TypeKind::Unsupported("data"),
                TypeKind::Class(&TIME_SERIES),
            ]),
            "The data values. The first dimension must be time.",
        ),
        P::required("unit", STR, "The base unit of measurement (should be SI unit)"),
        P::with_default(
            "resolution",
            FLOAT,
            DefaultValue::Float(-1.0),
            "The smallest meaningful difference (in specified unit) between values in data",
        ),
        P::with_default(
            "conversion",
            FLOAT,
            DefaultValue::Float(1.0),
            "Scalar to multiply each element in data to convert it to the specified unit",
        ),
        P::with_default(
            "offset",
            FLOAT,
            DefaultValue::Float(0.0),
            "Scalar to add to each element in the data scaled by 'conversion' to finish \
             converting it to the specified unit.",
        ),
        P::optional(
            "timestamps",
            DeclaredType::Tuple(&[
                TypeKind::Unsupported("array_data"),
                TypeKind::Unsupported("data"),
                TypeKind::Class(&TIME_SERIES),
            ]),
            "Timestamps for samples stored in data",
        ),
        P::optional("starting_time", FLOAT, "The timestamp of the first sample"),
        P::optional("rate", FLOAT, "Sampling rate in Hz"),
        P::with_default(
            "comments",
            STR,
            DefaultValue::Str("no comments"),
            "Human-readable comments about this TimeSeries dataset",
        ),
        P::with_default(
            "description",
            STR,
            DefaultValue::Str("no description"),
            "Description of this TimeSeries dataset",
        ),
        P::optional("control", ITERABLE, "Numerical labels that apply to each element in data"),
        P::optional("control_description", ITERABLE, "Description of each control value"),
    ],
    allow_extra: None,
};

/// `pynwb.ecephys.ElectricalSeries`
pub static ELECTRICAL_SERIES: ClassSpec = ClassSpec {
    module: "pynwb.ecephys",
    name: "ElectricalSeries",
    params: &[
        P::required("name", STR, "The name of this TimeSeries dataset"),
        P::required(
            "data",
            DeclaredType::Tuple(&[
                TypeKind::Unsupported("array_data"),
                TypeKind::Unsupported("data"),
                TypeKind::Class(&TIME_SERIES),
            ]),
            "The data values. Can be 1D or 2D. The first dimension must be time. The second \
             dimension represents electrodes/channels.",
        ),
        P::required(
            "electrodes",
            DeclaredType::Single(TypeKind::Class(&DYNAMIC_TABLE_REGION)),
            "the table region corresponding to the electrodes from which this series was recorded",
        ),
        P::with_default(
            "resolution",
            FLOAT,
            DefaultValue::Float(-1.0),
            "The smallest meaningful difference (in specified unit) between values in data",
        ),
        P::with_default(
            "conversion",
            FLOAT,
            DefaultValue::Float(1.0),
            "Scalar to multiply each element by to convert to volts",
        ),
        P::with_default(
            "offset",
            FLOAT,
            DefaultValue::Float(0.0),
            "Scalar to add to each element in the data scaled by 'conversion' to finish \
             converting it to volts.",
        ),
        P::optional(
            "timestamps",
            DeclaredType::Tuple(&[
                TypeKind::Unsupported("array_data"),
                TypeKind::Unsupported("data"),
                TypeKind::Class(&TIME_SERIES),
            ]),
            "Timestamps for samples stored in data",
        ),
        P::optional("starting_time", FLOAT, "The timestamp of the first sample"),
        P::optional("rate", FLOAT, "Sampling rate in Hz"),
        P::with_default(
            "comments",
            STR,
            DefaultValue::Str("no comments"),
            "Human-readable comments about this TimeSeries dataset",
        ),
        P::with_default(
            "description",
            STR,
            DefaultValue::Str("no description"),
            "Description of this TimeSeries dataset",
        ),
        P::optional("control", ITERABLE, "Numerical labels that apply to each element in data"),
        P::optional("control_description", ITERABLE, "Description of each control value"),
        P::optional("channel_conversion", ARRAY_DATA, "Channel-specific conversion factor"),
        P::optional("filtering", STR, "Filtering applied to all channels of the data"),
    ],
    allow_extra: None,
};

/// `pynwb.image.ImageSeries`
pub static IMAGE_SERIES: ClassSpec = ClassSpec {
    module: "pynwb.image",
    name: "ImageSeries",
    params: &[
        P::required("name", STR, "The name of this TimeSeries dataset"),
        P::optional(
            "data",
            DeclaredType::Tuple(&[
                TypeKind::Unsupported("array_data"),
                TypeKind::Unsupported("data"),
                TypeKind::Class(&TIME_SERIES),
            ]),
            "The data values. Must be 3D, where the first dimension must be time (frame)",
        ),
        P::optional(
            "unit",
            STR,
            "The unit of measurement of the image data, e.g., values between 0 and 255.",
        ),
        P::optional(
            "format",
            STR,
            "Format of image. Three types: 1) Image format; tiff, png, jpg, etc. 2) external 3) \
             raw.",
        ),
        P::optional("external_file", ARRAY_DATA, "Path or URL to one or more external file(s)."),
        P::optional(
            "starting_frame",
            ARRAY_DATA,
            "Each entry is the frame number in the corresponding external_file variable.",
        ),
        P::optional("bits_per_pixel", INT, "DEPRECATED: Number of bits per image pixel"),
        P::optional("dimension", ITERABLE, "Number of pixels on x, y, (and z) axes."),
        P::with_default(
            "resolution",
            FLOAT,
            DefaultValue::Float(-1.0),
            "The smallest meaningful difference (in specified unit) between values in data",
        ),
        P::with_default(
            "conversion",
            FLOAT,
            DefaultValue::Float(1.0),
            "Scalar to multiply each element in data to convert it to the specified unit",
        ),
        P::optional(
            "timestamps",
            DeclaredType::Tuple(&[
                TypeKind::Unsupported("array_data"),
                TypeKind::Unsupported("data"),
                TypeKind::Class(&TIME_SERIES),
            ]),
            "Timestamps for samples stored in data",
        ),
        P::optional("starting_time", FLOAT, "The timestamp of the first sample"),
        P::optional("rate", FLOAT, "Sampling rate in Hz"),
        P::with_default(
            "comments",
            STR,
            DefaultValue::Str("no comments"),
            "Human-readable comments about this TimeSeries dataset",
        ),
        P::with_default(
            "description",
            STR,
            DefaultValue::Str("no description"),
            "Description of this TimeSeries dataset",
        ),
        P::optional("control", ITERABLE, "Numerical labels that apply to each element in data"),
        P::optional("control_description", ITERABLE, "Description of each control value"),
        P::optional(
            "device",
            DeclaredType::Single(TypeKind::Class(&DEVICE)),
            "Device used to capture the images/video.",
        ),
    ],
    allow_extra: None,
};

/// `pynwb.ophys.OpticalChannel`
pub static OPTICAL_CHANNEL: ClassSpec = ClassSpec {
    module: "pynwb.ophys",
    name: "OpticalChannel",
    params: &[
        P::required("name", STR, "the name of this electrode"),
        P::required("description", STR, "Any notes or comments about the channel."),
        P::required("emission_lambda", FLOAT, "Emission wavelength for channel, in nm."),
    ],
    allow_extra: None,
};

/// `pynwb.ophys.ImagingPlane`
pub static IMAGING_PLANE: ClassSpec = ClassSpec {
    module: "pynwb.ophys",
    name: "ImagingPlane",
    params: &[
        P::required("name", STR, "The name of this container"),
        P::required(
            "optical_channel",
            DeclaredType::Tuple(&[
                TypeKind::Unsupported("list"),
                TypeKind::Class(&OPTICAL_CHANNEL),
            ]),
            "One of possibly many groups storing channels pecific data.",
        ),
        P::required("description", STR, "Description of this ImagingPlane."),
        P::required(
            "device",
            DeclaredType::Single(TypeKind::Class(&DEVICE)),
            "the device that was used to record",
        ),
        P::required("excitation_lambda", FLOAT, "Excitation wavelength in nm."),
        P::required("indicator", STR, "Calcium indicator"),
        P::required("location", STR, "Location of image plane."),
        P::optional(
            "imaging_rate",
            FLOAT,
            "Rate images are acquired, in Hz. If the corresponding TimeSeries is present, the \
             rate should be stored there instead.",
        ),
        P::optional(
            "manifold",
            ITERABLE,
            "DEPRECATED: Physical position of each pixel. size=(\"height\", \"width\", \"xyz\").",
        ),
        P::with_default(
            "conversion",
            FLOAT,
            DefaultValue::Float(1.0),
            "DEPRECATED: Multiplier to get from stored values to specified unit (e.g., 1e-3 for \
             millimeters)",
        ),
        P::with_default(
            "unit",
            STR,
            DefaultValue::Str("meters"),
            "DEPRECATED: Base unit that coordinates are stored in (e.g., Meters).",
        ),
        P::optional(
            "reference_frame",
            STR,
            "Describes position and reference frame of manifold based on position of first \
             element in manifold.",
        ),
        P::optional(
            "origin_coords",
            ARRAY_DATA,
            "Physical location of the first element of the imaging plane (0, 0) for 2-D data or \
             (0, 0, 0) for 3-D data.",
        ),
        P::with_default(
            "origin_coords_unit",
            STR,
            DefaultValue::Str("meters"),
            "Measurement units for origin_coords. The default value is 'meters'.",
        ),
        P::optional(
            "grid_spacing",
            ARRAY_DATA,
            "Space between pixels in (x, y) or voxels in (x, y, z) directions.",
        ),
        P::with_default(
            "grid_spacing_unit",
            STR,
            DefaultValue::Str("meters"),
            "Measurement units for grid_spacing. The default value is 'meters'.",
        ),
    ],
    allow_extra: None,
};

/// `pynwb.ophys.TwoPhotonSeries`
pub static TWO_PHOTON_SERIES: ClassSpec = ClassSpec {
    module: "pynwb.ophys",
    name: "TwoPhotonSeries",
    params: &[
        P::required("name", STR, "The name of this TimeSeries dataset"),
        P::required(
            "imaging_plane",
            DeclaredType::Single(TypeKind::Class(&IMAGING_PLANE)),
            "Imaging plane class/pointer.",
        ),
        P::optional(
            "data",
            DeclaredType::Tuple(&[
                TypeKind::Unsupported("array_data"),
                TypeKind::Unsupported("data"),
                TypeKind::Class(&TIME_SERIES),
            ]),
            "The data values. May be 3D or 4D. The first dimension must be time (frame).",
        ),
        P::optional("unit", STR, "The base unit of measurement (should be SI unit)"),
        P::optional(
            "format",
            STR,
            "Format of image. Three types: 1) Image format; tiff, png, jpg, etc. 2) external 3) \
             raw.",
        ),
        P::optional(
            "field_of_view",
            ARRAY_DATA,
            "Width, height and depth of image, or imaged area (meters).",
        ),
        P::optional("pmt_gain", FLOAT, "Photomultiplier gain."),
        P::optional(
            "scan_line_rate",
            FLOAT,
            "Lines imaged per second. This is also stored in /general/optophysiology but is kept \
             here as it is useful information for analysis, and so good to be stored w/ the \
             actual data.",
        ),
        P::optional("external_file", ARRAY_DATA, "Path or URL to one or more external file(s)."),
        P::optional(
            "starting_frame",
            ARRAY_DATA,
            "Each entry is the frame number in the corresponding external_file variable.",
        ),
        P::optional("bits_per_pixel", INT, "DEPRECATED: Number of bits per image pixel"),
        P::optional("dimension", ITERABLE, "Number of pixels on x, y, (and z) axes."),
        P::with_default(
            "resolution",
            FLOAT,
            DefaultValue::Float(-1.0),
            "The smallest meaningful difference (in specified unit) between values in data",
        ),
        P::with_default(
            "conversion",
            FLOAT,
            DefaultValue::Float(1.0),
            "Scalar to multiply each element in data to convert it to the specified unit",
        ),
        P::optional(
            "timestamps",
            DeclaredType::Tuple(&[
                TypeKind::Unsupported("array_data"),
                TypeKind::Unsupported("data"),
                TypeKind::Class(&TIME_SERIES),
            ]),
            "Timestamps for samples stored in data",
        ),
        P::optional("starting_time", FLOAT, "The timestamp of the first sample"),
        P::optional("rate", FLOAT, "Sampling rate in Hz"),
        P::with_default(
            "comments",
            STR,
            DefaultValue::Str("no comments"),
            "Human-readable comments about this TimeSeries dataset",
        ),
        P::with_default(
            "description",
            STR,
            DefaultValue::Str("no description"),
            "Description of this TimeSeries dataset",
        ),
        P::optional("control", ITERABLE, "Numerical labels that apply to each element in data"),
        P::optional("control_description", ITERABLE, "Description of each control value"),
        P::optional(
            "device",
            DeclaredType::Single(TypeKind::Class(&DEVICE)),
            "Device used to capture the images/video.",
        ),
    ],
    allow_extra: None,
};

/// `pynwb.icephys.IntracellularElectrode`
pub static INTRACELLULAR_ELECTRODE: ClassSpec = ClassSpec {
    module: "pynwb.icephys",
    name: "IntracellularElectrode",
    params: &[
        P::required("name", STR, "the name of this electrode"),
        P::required(
            "device",
            DeclaredType::Single(TypeKind::Class(&DEVICE)),
            "the device that was used to record from this electrode",
        ),
        P::required(
            "description",
            STR,
            "Recording description, description of electrode (e.g., whole-cell, sharp, etc) \
             COMMENT: Free-form text (can be from Methods)",
        ),
        P::optional("slice", STR, "Information about slice used for recording."),
        P::optional("seal", STR, "Information about seal used for recording."),
        P::optional(
            "location",
            STR,
            "Area, layer, comments on estimation, stereotaxis coordinates (if in vivo, etc).",
        ),
        P::optional("resistance", STR, "Electrode resistance COMMENT: unit: Ohm."),
        P::optional("filtering", STR, "Electrode specific filtering."),
        P::optional("initial_access_resistance", STR, "Initial access resistance."),
        P::optional("cell_id", STR, "Unique ID of cell."),
    ],
    allow_extra: None,
};

/// `pynwb.file.Subject`
pub static SUBJECT: ClassSpec = ClassSpec {
    module: "pynwb.file",
    name: "Subject",
    params: &[
        P::optional(
            "age",
            STR,
            "The age of the subject. The ISO 8601 Duration format is recommended, e.g., \"P90D\" \
             for 90 days old.",
        ),
        P::optional("description", STR, "A description of the subject, e.g., \"mouse A10\"."),
        P::optional(
            "genotype",
            STR,
            "The genotype of the subject, e.g., \"Sst-IRES-Cre/wt;Ai32(RCL-ChR2(H134R)_EYFP)/wt\".",
        ),
        P::optional(
            "sex",
            STR,
            "The sex of the subject. Using \"F\" (female), \"M\" (male), \"U\" (unknown), or \
             \"O\" (other) is recommended.",
        ),
        P::optional(
            "species",
            STR,
            "The species of the subject. The formal latin binomal name is recommended, e.g., \
             \"Mus musculus\"",
        ),
        P::optional("subject_id", STR, "A unique identifier for the subject, e.g., \"A10\""),
        P::optional(
            "weight",
            DeclaredType::Tuple(&[TypeKind::Float, TypeKind::Str]),
            "The weight of the subject, including units. Using kilograms is recommended. e.g., \
             \"0.02 kg\".",
        ),
        P::optional("strain", STR, "The strain of the subject, e.g., \"C57BL/6J\""),
        P::optional(
            "date_of_birth",
            DeclaredType::Single(TypeKind::DateTime),
            "The datetime of the date of birth. May be supplied instead of age.",
        ),
    ],
    allow_extra: None,
};

/// Structured objects referenced by name instead of being embedded.
pub static LINKABLE_CLASSES: [&ClassSpec; 3] = [&DEVICE, &IMAGING_PLANE, &IMAGE_SERIES];

/// Structured objects that never appear in generated schemas.
pub static SKIPPED_CLASS: &ClassSpec = &TIME_SERIES;
