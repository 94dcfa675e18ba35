// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

/// Reserved field appended to every outgoing telegram body.
pub const RESERVED: &str = "00";

/// Line terminator for outgoing telegrams.
pub const CRLF: &str = "\r\n";

/// Highest word number accepted by the `sw` (speak word) command.
pub const MAX_SPEECH_WORD: u16 = 473;

/// Label used when a command code has no table entry.
pub const UNKNOWN_MESSAGE: &str = "Unknown message";

/// Label used when an `AR` alarm code has no table entry.
pub const UNKNOWN_ALARM_CODE: &str = "Unknown alarm code message";

/// Command code labels. Uppercase codes originate at the panel, lowercase
/// codes are sent to it.
pub const COMMAND_LABELS: &[(&str, &str)] = &[
    ("a0", "Disarm"),
    ("a1", "Arm to Away"),
    ("a2", "Arm to Stay"),
    ("a3", "Arm to Stay Instant"),
    ("a4", "Arm to Night"),
    ("a5", "Arm to Night Instant"),
    ("a6", "Arm to Vacation"),
    ("a7", "Arm, Step to Next Away Mode"),
    ("a8", "Arm, Step to Next Stay Mode"),
    ("AM", "Alarm Memory Update"),
    ("AR", "Alarm Reporting to Ethernet"),
    ("ar", "Alarm Reporting Acknowledge"),
    ("AS", "Arming Status Report Data"),
    ("as", "Request Arming Status"),
    ("AT", "Ethernet Test to IP"),
    ("at", "Ethernet Test Acknowledge"),
    ("AZ", "Alarm By Zone Report Data"),
    ("az", "Alarm By Zone Request"),
    ("CC", "Control Output Change Update"),
    ("cf", "Control Output Off"),
    ("cn", "Control Output On"),
    ("cs", "Control Output Status Request"),
    ("CS", "Control Output Status Report"),
    ("ct", "Control Output Toggle"),
    ("cp", "Request ALL Custom Values"),
    ("cr", "Request Custom Value"),
    ("CR", "Custom Value Report Data"),
    ("cw", "Write Custom Value Data"),
    ("cv", "Request Counter Value"),
    ("CV", "Counter Value Data"),
    ("cx", "Write Counter Value"),
    ("dm", "Display Text on LCD Screen"),
    ("EE", "Entry/Exit Time Data"),
    ("EM", "Email Trigger to M1XEP"),
    ("IC", "Send Valid User Number And Invalid User Code"),
    ("IE", "Installer Program Exited"),
    ("ka", "Request Keypad Area Assignments"),
    ("KA", "Keypad Areas Report Data"),
    ("KC", "Keypad KeyChange Update"),
    ("kf", "Request Keypad Function Key Press"),
    ("KF", "Keypad Function Key Press Data"),
    ("ld", "Request Log Data"),
    ("LD", "Log Data with Index"),
    ("le", "Write Log Data Entry"),
    ("lw", "Request Temperature Data of All Zones"),
    ("LW", "Temperature Data of All Zones"),
    ("pc", "Control Any PLC Device"),
    ("PC", "PLC Change Update"),
    ("pf", "Turn OFF PLC Device"),
    ("pn", "Turn ON PLC Device"),
    ("ps", "Request PLC Status"),
    ("PS", "Returned PLC Status"),
    ("pt", "Toggle PLC Device"),
    ("RE", "Reset Ethernet Module"),
    ("RP", "ELKRP Connected"),
    ("rr", "Request Real Time Clock Read"),
    ("RR", "Real Time Clock Data"),
    ("rw", "Real Time Clock Write"),
    ("sd", "Request ASCII String Text Descriptions"),
    ("SD", "ASCII String Text Descriptions Data"),
    ("sp", "Speak Phrase"),
    ("ss", "Request System Trouble Status"),
    ("SS", "System Trouble Status Data"),
    ("st", "Request Temperature"),
    ("ST", "Temperature Data"),
    ("sw", "Speak Word"),
    ("TC", "Task Change Update"),
    ("tn", "Task Activation"),
    ("tr", "Request Thermostat Data"),
    ("TR", "Thermostat Data Report"),
    ("ts", "Set Thermostat Data"),
    ("ua", "Request Valid User Code Areas"),
    ("UA", "Valid User Code Areas Report Data"),
    ("vn", "Request M1 Version Number"),
    ("VN", "M1 Version Number Data"),
    ("XK", "Ethernet Test Reply"),
    ("zb", "Zone Bypass Request"),
    ("ZB", "Zone Bypass Request Reply"),
    ("ZC", "Zone Change Update"),
    ("zd", "Request Zone Definition Data"),
    ("ZD", "Zone Definition Data"),
    ("zp", "Request Zone Partition"),
    ("ZP", "Zone Partition Report Data"),
    ("zs", "Request Zone Status"),
    ("ZS", "Zone Status Report Data"),
    ("zt", "Zone Trigger"),
    ("zv", "Request Zone Analog Voltage"),
    ("ZV", "Zone Analog Voltage Data"),
];

/// Contact ID event codes carried in `AR` alarm reports. The four-digit
/// alarm code is the event qualifier (`1` new event, `3` restore) followed by
/// one of these three-digit codes.
pub const CONTACT_ID_EVENTS: &[(u32, &str)] = &[
    (100, "Medical"),
    (101, "Personal Emergency"),
    (110, "Fire"),
    (111, "Smoke"),
    (114, "Heat"),
    (120, "Panic"),
    (121, "Duress"),
    (122, "Silent Panic"),
    (123, "Audible Panic"),
    (130, "Burglary"),
    (131, "Perimeter"),
    (132, "Interior"),
    (133, "24 Hour (Safe)"),
    (134, "Entry/Exit"),
    (137, "Tamper"),
    (140, "General Alarm"),
    (150, "24 Hour Non-Burglary"),
    (151, "Gas Detected"),
    (154, "Water Leakage"),
    (158, "High Temperature"),
    (159, "Low Temperature"),
    (162, "Carbon Monoxide Detected"),
    (301, "AC Loss"),
    (302, "Low System Battery"),
    (305, "System Reset"),
    (306, "Panel Programming Changed"),
    (321, "Bell 1 Trouble"),
    (333, "Expansion Module Failure"),
    (344, "RF Receiver Jam Detect"),
    (350, "Communication Trouble"),
    (373, "Fire Trouble"),
    (380, "Sensor Trouble"),
    (381, "Loss of Supervision - RF"),
    (383, "Sensor Tamper"),
    (384, "RF Low Battery"),
    (400, "Open/Close"),
    (401, "Open/Close by User"),
    (403, "Automatic Open/Close"),
    (406, "Cancel"),
    (407, "Remote Arm/Disarm"),
    (408, "Quick Arm"),
    (409, "Keyswitch Open/Close"),
    (441, "Armed Stay"),
    (461, "Wrong Code Entry"),
    (570, "Zone Bypass"),
    (602, "Periodic Test Report"),
    (627, "Program Mode Entry"),
    (628, "Program Mode Exit"),
];

/// `AS` arm status, one character per area.
pub const ARM_STATUSES: &[(char, &str)] = &[
    ('0', "Disarmed"),
    ('1', "Armed Away"),
    ('2', "Armed Stay"),
    ('3', "Armed Stay Instant"),
    ('4', "Armed to Night"),
    ('5', "Armed to Night Instant"),
    ('6', "Armed to Vacation"),
];

/// `AS` arm-up state, one character per area.
pub const ARM_UP_STATES: &[(char, &str)] = &[
    ('0', "Not Ready To Arm"),
    ('1', "Ready To Arm"),
    ('2', "Ready To Arm, but a zone is violated and can be Force Armed"),
    ('3', "Armed with Exit Timer working"),
    ('4', "Armed Fully"),
    ('5', "Force Armed with a force arm zone violated"),
    ('6', "Armed with a Bypass"),
];

/// `AS` alarm state, one character per area.
pub const ALARM_STATES: &[(char, &str)] = &[
    ('0', "No Alarm Active"),
    ('1', "Entrance Delay is Active"),
    ('2', "Alarm Abort Delay Active"),
    ('3', "Fire Alarm"),
    ('4', "Medical Alarm"),
    ('5', "Police Alarm"),
    ('6', "Burglar Alarm"),
    ('7', "Aux 1 Alarm"),
    ('8', "Aux 2 Alarm"),
    ('9', "Aux 3 Alarm"),
    (':', "Aux 4 Alarm"),
    (';', "Carbon Monoxide Alarm"),
    ('<', "Emergency Alarm"),
    ('=', "Freeze Alarm"),
    ('>', "Gas Alarm"),
    ('?', "Heat Alarm"),
    ('@', "Water Alarm"),
    ('A', "Fire Supervisory"),
    ('B', "Verify Fire"),
];

/// `ZC` zone state. The hex digit packs the logical state (high two bits)
/// and the physical state (low two bits).
pub const ZONE_STATES: &[(char, &str)] = &[
    ('0', "Normal: Unconfigured"),
    ('1', "Normal: Open"),
    ('2', "Normal: EOL"),
    ('3', "Normal: Short"),
    ('4', "Not Used"),
    ('5', "Trouble: Open"),
    ('6', "Trouble: EOL"),
    ('7', "Trouble: Short"),
    ('8', "Not Used"),
    ('9', "Violated: Open"),
    ('A', "Violated: EOL"),
    ('B', "Violated: Short"),
    ('C', "Soft Bypassed"),
    ('D', "Bypassed: Open"),
    ('E', "Bypassed: EOL"),
    ('F', "Bypassed: Short"),
];

/// `KC` key codes.
pub const KEY_TABLE: &[(u32, &str)] = &[
    (0, "No Key Pressed"),
    (1, "1"),
    (2, "2"),
    (3, "3"),
    (4, "4"),
    (5, "5"),
    (6, "6"),
    (7, "7"),
    (8, "8"),
    (9, "9"),
    (10, "0"),
    (11, "*"),
    (12, "#"),
    (13, "F1"),
    (14, "F2"),
    (15, "F3"),
    (16, "F4"),
    (17, "Stay"),
    (18, "Exit"),
    (19, "Chime"),
    (20, "Bypass"),
    (21, "Elk"),
    (22, "Down"),
    (23, "Up"),
    (24, "Right"),
    (25, "Left"),
    (26, "F6"),
    (27, "F5"),
    (28, "Data Key Mode"),
];

/// `KC` function key illumination status.
pub const KEY_STATUSES: &[(char, &str)] = &[
    ('0', "Off"),
    ('1', "On"),
    ('2', "Blinking"),
];
